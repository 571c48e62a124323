use serde::Deserialize;

/// Minimal organization metadata, fetched once at discovery.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgRecord {
    pub id: i64,
    pub login: String,
}

/// One element of an organization's repository listing. The API exposes many
/// more fields; only the persisted ones plus the contributors cursor are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    pub contributors_url: String,
}

/// One element of an organization's public-member listing.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRecord {
    pub id: i64,
    pub login: String,
}

/// One element of a repository's contributor listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributorRecord {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub contributions: i64,
}
