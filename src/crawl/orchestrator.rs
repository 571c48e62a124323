use std::sync::Arc;

use tracing::{error, info};

use crate::error::Result;
use crate::github::{ContributorRecord, GithubClient, MemberRecord, RepoRecord};
use crate::store::Store;
use crate::types::{ContributorRow, Organization, Repository, User};

use super::status::StatusTracker;

/// Walks one organization's resource graph to exhaustion: the public-members
/// stream first, then the repositories stream, draining every discovered
/// repository's contributors before the next page of repositories.
///
/// The store has a single logical writer, so network calls are serialized
/// too: each page is persisted before the next fetch is issued. Multiple
/// organizations' crawls may run as independent tasks; they share nothing
/// but the status tracker.
pub struct Crawler {
    github: GithubClient,
    store: Arc<dyn Store>,
    status: Arc<StatusTracker>,
}

impl Crawler {
    pub fn new(github: GithubClient, store: Arc<dyn Store>, status: Arc<StatusTracker>) -> Self {
        Self {
            github,
            store,
            status,
        }
    }

    /// Fetches minimal metadata for the organization and creates its row.
    /// The caller must hold the claim from [`StatusTracker::try_begin`];
    /// a duplicate row here means a re-entrant trigger and propagates as a
    /// fatal error.
    pub async fn discover(&self, login: &str) -> Result<Organization> {
        let record = self.github.get_org(login).await?;
        let org = Organization {
            id: record.id,
            login: record.login.to_lowercase(),
        };
        self.store.create_organization(&org)?;
        info!(login = %org.login, id = org.id, "organization discovered");
        Ok(org)
    }

    /// Runs the full crawl on a detached task. The caller gets no handle:
    /// completion is observed through the status tracker.
    pub fn spawn(self: Arc<Self>, org: Organization) {
        tokio::spawn(async move {
            let _ = self.run(&org).await;
        });
    }

    /// Crawls to completion and settles the organization's status key.
    pub async fn run(&self, org: &Organization) -> Result<()> {
        match self.crawl_organization(org).await {
            Ok(()) => {
                let elapsed_ms = self
                    .status
                    .mark_done(&org.login)
                    .map(|d| d.num_milliseconds());
                info!(login = %org.login, elapsed_ms, "crawl complete");
                Ok(())
            }
            Err(err) => {
                self.status.mark_failed(&org.login);
                error!(login = %org.login, error = %err, "crawl failed");
                Err(err)
            }
        }
    }

    async fn crawl_organization(&self, org: &Organization) -> Result<()> {
        self.drain_public_members(org).await?;
        self.drain_repositories(org).await?;
        Ok(())
    }

    async fn drain_public_members(&self, org: &Organization) -> Result<()> {
        let url = self.github.org_public_members_url(&org.login);
        let mut pages = self.github.pages::<MemberRecord>(url);

        while let Some(members) = pages.next_page().await? {
            let users: Vec<User> = members
                .iter()
                .map(|m| User {
                    id: m.id,
                    login: m.login.clone(),
                })
                .collect();
            let user_ids: Vec<i64> = members.iter().map(|m| m.id).collect();

            // Users go in before the association rows that reference them.
            self.store.upsert_users(&users)?;
            self.store.upsert_org_public_members(org.id, &user_ids)?;
        }

        info!(login = %org.login, "public members drained");
        Ok(())
    }

    async fn drain_repositories(&self, org: &Organization) -> Result<()> {
        let url = self.github.org_repos_url(&org.login);
        let mut pages = self.github.pages::<RepoRecord>(url);

        while let Some(records) = pages.next_page().await? {
            let repos: Vec<Repository> = records
                .iter()
                .map(|r| Repository {
                    id: r.id,
                    name: r.name.clone(),
                    stars: r.stargazers_count,
                    forks: r.forks_count,
                    org_id: org.id,
                })
                .collect();
            self.store.insert_repositories(org.id, &repos)?;

            for record in &records {
                self.drain_contributors(record.id, &record.contributors_url)
                    .await?;
            }
        }

        info!(login = %org.login, "repositories drained");
        Ok(())
    }

    async fn drain_contributors(&self, repo_id: i64, contributors_url: &str) -> Result<()> {
        let mut pages = self
            .github
            .pages::<ContributorRecord>(contributors_url.to_string());

        while let Some(contributors) = pages.next_page().await? {
            let users: Vec<User> = contributors
                .iter()
                .map(|c| User {
                    id: c.id,
                    login: c.login.clone(),
                })
                .collect();
            let rows: Vec<ContributorRow> = contributors
                .iter()
                .map(|c| ContributorRow {
                    user_id: c.id,
                    contributions: c.contributions,
                })
                .collect();

            self.store.upsert_users(&users)?;
            self.store.upsert_repo_contributors(repo_id, &rows)?;
        }

        Ok(())
    }
}
