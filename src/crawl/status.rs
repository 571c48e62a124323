use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

/// Crawl state for one organization. A key that is absent from the tracker is
/// in the implicit `Unknown` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    InProgress,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    status: CrawlStatus,
    started: DateTime<Utc>,
}

/// Process-wide crawl state, keyed by lowercase organization login.
///
/// In-memory only: a restart starts from an empty map, and a restarted
/// process that re-discovers an already-persisted organization fails loudly
/// on the duplicate insert rather than silently re-crawling.
pub struct StatusTracker {
    states: Mutex<HashMap<String, Tracked>>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
        }
    }

    fn states(&self) -> MutexGuard<'_, HashMap<String, Tracked>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, login: &str) -> Option<CrawlStatus> {
        self.states().get(&login.to_lowercase()).map(|t| t.status)
    }

    /// Atomically claims the key for a new crawl. Returns true when this
    /// caller won the claim and is responsible for starting the crawl; any
    /// concurrent or later caller gets false.
    pub fn try_begin(&self, login: &str) -> bool {
        match self.states().entry(login.to_lowercase()) {
            Entry::Vacant(slot) => {
                slot.insert(Tracked {
                    status: CrawlStatus::InProgress,
                    started: Utc::now(),
                });
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Marks a finished crawl. Returns the elapsed time since the key was
    /// claimed, when it was.
    pub fn mark_done(&self, login: &str) -> Option<Duration> {
        self.finish(login, CrawlStatus::Done)
    }

    /// Marks a crawl that aborted on an error. Terminal: there is no retry
    /// path short of a process restart.
    pub fn mark_failed(&self, login: &str) -> Option<Duration> {
        self.finish(login, CrawlStatus::Failed)
    }

    fn finish(&self, login: &str, status: CrawlStatus) -> Option<Duration> {
        let now = Utc::now();
        match self.states().entry(login.to_lowercase()) {
            Entry::Occupied(mut entry) => {
                let started = entry.get().started;
                entry.get_mut().status = status;
                Some(now - started)
            }
            Entry::Vacant(slot) => {
                slot.insert(Tracked { status, started: now });
                None
            }
        }
    }

    /// Releases a key claimed by `try_begin` before any data was written,
    /// returning it to `Unknown`. Used when discovery finds the organization
    /// does not exist upstream.
    pub fn clear(&self, login: &str) {
        self.states().remove(&login.to_lowercase());
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
