use serde::{Deserialize, Serialize};

/// An organization as stored locally. The id comes from the remote system;
/// `login` is always held in lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub stars: i64,
    pub forks: i64,
    pub org_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
}

/// One contributor's count for a repository, keyed by `(repo_id, user_id)`
/// at the storage level.
#[derive(Debug, Clone)]
pub struct ContributorRow {
    pub user_id: i64,
    pub contributions: i64,
}

/// Read-side report row: a repository plus the sum of its recorded
/// contribution counts. `contributions` is `None` when no contributor rows
/// exist yet for the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoReport {
    pub id: i64,
    pub name: String,
    pub stars: i64,
    pub forks: i64,
    pub contributions: Option<i64>,
}
