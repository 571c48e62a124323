pub const SCHEMA: &str = r#"
-- Organizations discovered from the remote API; login is stored lowercase
CREATE TABLE IF NOT EXISTS organizations (
    id INTEGER PRIMARY KEY,
    login TEXT NOT NULL UNIQUE
);

-- Repositories are write-once per organization
CREATE TABLE IF NOT EXISTS repositories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    stars INTEGER NOT NULL DEFAULT 0,
    forks INTEGER NOT NULL DEFAULT 0,
    org_id INTEGER NOT NULL REFERENCES organizations(id),

    UNIQUE(id, org_id)
);

-- Users may appear as contributors to many repos and members of many orgs
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    login TEXT NOT NULL
);

-- Contribution counts, one row per (repo, user)
CREATE TABLE IF NOT EXISTS repo_contributors (
    repo_id INTEGER NOT NULL REFERENCES repositories(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    contributions INTEGER NOT NULL DEFAULT 0,

    UNIQUE(repo_id, user_id)
);

CREATE TABLE IF NOT EXISTS org_public_members (
    org_id INTEGER NOT NULL REFERENCES organizations(id),
    user_id INTEGER NOT NULL REFERENCES users(id),

    UNIQUE(org_id, user_id)
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_repositories_org ON repositories(org_id);
CREATE INDEX IF NOT EXISTS idx_repo_contributors_repo ON repo_contributors(repo_id);
CREATE INDEX IF NOT EXISTS idx_org_public_members_org ON org_public_members(org_id);
"#;
