//! # Orgscope
//!
//! Crawls a GitHub organization's repositories, per-repository contributors,
//! and public members into a local SQLite database, and serves a polling
//! report API: a poll either triggers the crawl, reports it in progress, or
//! returns the finished report of repositories with summed contribution
//! counts. Usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orgscope::crawl::{Crawler, StatusTracker};
//! use orgscope::github::{DEFAULT_API_URL, GithubClient};
//! use orgscope::server::{AppState, create_router};
//! use orgscope::store::{SqliteStore, Store};
//!
//! let store: Arc<dyn Store> = Arc::new(SqliteStore::new("./data/orgscope.db").unwrap());
//! store.initialize().unwrap();
//!
//! let status = Arc::new(StatusTracker::new());
//! let github = GithubClient::new(DEFAULT_API_URL, None).unwrap();
//! let crawler = Arc::new(Crawler::new(github, store.clone(), status.clone()));
//!
//! let router = create_router(Arc::new(AppState { store, status, crawler }));
//! // Serve with axum...
//! ```

pub mod config;
pub mod crawl;
pub mod error;
pub mod github;
pub mod server;
pub mod store;
pub mod types;
