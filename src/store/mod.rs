mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Batch operations are transactional: every row in the batch is written or
/// none is, so a crawl page is never half-persisted.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Organization operations
    /// Fails with [`crate::error::Error::AlreadyExists`] if the id or login is
    /// already taken. The login is normalized to lowercase before storage.
    fn create_organization(&self, org: &Organization) -> Result<()>;
    fn get_organization_by_login(&self, login: &str) -> Result<Option<Organization>>;
    fn get_organization_by_id(&self, id: i64) -> Result<Option<Organization>>;

    // Repository operations
    /// Batch insert. Repositories are write-once: a duplicate `(id, org_id)`
    /// pair fails with [`crate::error::Error::AlreadyExists`].
    fn insert_repositories(&self, org_id: i64, repos: &[Repository]) -> Result<()>;

    /// Insert-if-absent; encountering a known user again is a no-op.
    fn upsert_users(&self, users: &[User]) -> Result<()>;

    /// Insert-if-absent, keyed by `(repo_id, user_id)`.
    fn upsert_repo_contributors(&self, repo_id: i64, rows: &[ContributorRow]) -> Result<()>;

    /// Insert-if-absent, keyed by `(org_id, user_id)`.
    fn upsert_org_public_members(&self, org_id: i64, user_ids: &[i64]) -> Result<()>;

    // Read queries
    /// Each repository of the organization with the sum of its recorded
    /// contribution counts (None when no contributor rows exist yet).
    fn list_repositories_with_contributions(&self, org_id: i64) -> Result<Vec<RepoReport>>;

    fn list_org_public_members(&self, org_id: i64) -> Result<Vec<User>>;

    fn close(&self) -> Result<()>;
}
