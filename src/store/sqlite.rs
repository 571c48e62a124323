use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, mainly for tests and throwaway runs.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn map_insert_err(err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            Error::AlreadyExists
        }
        _ => Error::Database(err),
    }
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Organization operations

    fn create_organization(&self, org: &Organization) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO organizations (id, login) VALUES (?1, ?2)",
                params![org.id, org.login.to_lowercase()],
            )
            .map_err(map_insert_err)?;
        Ok(())
    }

    fn get_organization_by_login(&self, login: &str) -> Result<Option<Organization>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, login FROM organizations WHERE login = ?1",
            params![login.to_lowercase()],
            |row| {
                Ok(Organization {
                    id: row.get(0)?,
                    login: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_organization_by_id(&self, id: i64) -> Result<Option<Organization>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, login FROM organizations WHERE id = ?1",
            params![id],
            |row| {
                Ok(Organization {
                    id: row.get(0)?,
                    login: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    // Repository operations

    fn insert_repositories(&self, org_id: i64, repos: &[Repository]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO repositories (id, name, stars, forks, org_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for repo in repos {
                stmt.execute(params![repo.id, repo.name, repo.stars, repo.forks, org_id])
                    .map_err(map_insert_err)?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_users(&self, users: &[User]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO users (id, login) VALUES (?1, ?2)")?;
            for user in users {
                stmt.execute(params![user.id, user.login])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_repo_contributors(&self, repo_id: i64, rows: &[ContributorRow]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO repo_contributors (repo_id, user_id, contributions)
                 VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(params![repo_id, row.user_id, row.contributions])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_org_public_members(&self, org_id: i64, user_ids: &[i64]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO org_public_members (org_id, user_id) VALUES (?1, ?2)",
            )?;
            for user_id in user_ids {
                stmt.execute(params![org_id, user_id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // Report query

    fn list_repositories_with_contributions(&self, org_id: i64) -> Result<Vec<RepoReport>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, stars, forks,
                    (SELECT SUM(contributions) FROM repo_contributors
                     WHERE repo_contributors.repo_id = repositories.id) AS contributions
             FROM repositories WHERE org_id = ?1",
        )?;

        let rows = stmt.query_map(params![org_id], |row| {
            Ok(RepoReport {
                id: row.get(0)?,
                name: row.get(1)?,
                stars: row.get(2)?,
                forks: row.get(3)?,
                contributions: row.get(4)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_org_public_members(&self, org_id: i64) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT users.id, users.login FROM org_public_members
             JOIN users ON users.id = org_public_members.user_id
             WHERE org_public_members.org_id = ?1",
        )?;

        let rows = stmt.query_map(params![org_id], |row| {
            Ok(User {
                id: row.get(0)?,
                login: row.get(1)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
