use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::crawl::CrawlStatus;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::LoadingResponse;
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};

/// Polling contract: the first request for an unknown organization claims its
/// status key, persists the organization, and triggers a detached crawl.
/// Every poll returns immediately; "loading data" until the crawl settles,
/// then the report.
pub async fn show_org(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let login = name.to_lowercase();

    match state.status.get(&login) {
        None => {
            if !state.status.try_begin(&login) {
                // Lost the claim to a concurrent first request; the winner's
                // organization row may not be visible yet.
                return loading_reply(&state, &login);
            }

            let org = match state.crawler.discover(&login).await {
                Ok(org) => org,
                Err(Error::NotFound) => {
                    state.status.clear(&login);
                    return Err(ApiError::not_found("Organization does not exist upstream"));
                }
                Err(Error::AlreadyExists) => {
                    // Persisted by an earlier process; in-memory status was
                    // lost and re-crawling would double-count contributions.
                    state.status.mark_failed(&login);
                    return Err(ApiError::conflict(
                        "Organization already persisted but its crawl state was lost",
                    ));
                }
                Err(err) => {
                    state.status.clear(&login);
                    tracing::error!(login = %login, error = %err, "discovery failed");
                    return Err(ApiError::bad_gateway("Failed to reach the remote API"));
                }
            };

            Arc::clone(&state.crawler).spawn(org.clone());
            Ok(Json(LoadingResponse::new(Some(org.id))).into_response())
        }
        Some(CrawlStatus::InProgress) => loading_reply(&state, &login),
        Some(CrawlStatus::Failed) => Err(ApiError::bad_gateway(
            "Crawl failed; restart the server to retry",
        )),
        Some(CrawlStatus::Done) => report_reply(&state, &login),
    }
}

/// Compatibility two-phase flow: synchronously crawl an already discovered
/// organization by id, then return the report.
pub async fn crawl_org(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let org = state
        .store
        .get_organization_by_id(id)
        .api_err("Failed to look up organization")?
        .or_not_found("Organization not found")?;

    state
        .crawler
        .run(&org)
        .await
        .map_err(|_| ApiError::bad_gateway("Crawl failed"))?;

    let report = state
        .store
        .list_repositories_with_contributions(org.id)
        .api_err("Failed to build report")?;
    Ok(Json(report).into_response())
}

fn loading_reply(state: &AppState, login: &str) -> Result<Response, ApiError> {
    let org_id = state
        .store
        .get_organization_by_login(login)
        .api_err("Failed to look up organization")?
        .map(|org| org.id);
    Ok(Json(LoadingResponse::new(org_id)).into_response())
}

fn report_reply(state: &AppState, login: &str) -> Result<Response, ApiError> {
    let org = state
        .store
        .get_organization_by_login(login)
        .api_err("Failed to look up organization")?
        .or_not_found("Organization not found")?;
    let report = state
        .store
        .list_repositories_with_contributions(org.id)
        .api_err("Failed to build report")?;
    Ok(Json(report).into_response())
}
