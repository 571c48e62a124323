use serde::Serialize;

/// Polling reply while a crawl has not finished. `org_id` is omitted when the
/// organization row is not visible yet (a poll that lost the discovery race).
#[derive(Debug, Serialize)]
pub struct LoadingResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
}

impl LoadingResponse {
    #[must_use]
    pub fn new(org_id: Option<i64>) -> Self {
        Self {
            message: "loading data",
            org_id,
        }
    }
}
