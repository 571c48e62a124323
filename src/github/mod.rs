mod client;
mod link;
mod records;

pub use client::{DEFAULT_API_URL, GithubClient, Page, PageStream};
pub use link::RelLinks;
pub use records::{ContributorRecord, MemberRecord, OrgRecord, RepoRecord};
