mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use orgscope::crawl::{Crawler, StatusTracker};
use orgscope::github::GithubClient;
use orgscope::server::{AppState, create_router};
use orgscope::store::{SqliteStore, Store};
use orgscope::types::Organization;
use serde_json::{Value, json};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{mount_contributors, mount_org, page, repo_json};

fn build_app(base_url: &str) -> (Router, Arc<AppState>) {
    let store: Arc<dyn Store> = Arc::new(SqliteStore::in_memory().unwrap());
    store.initialize().unwrap();

    let status = Arc::new(StatusTracker::new());
    let github = GithubClient::new(base_url, None).unwrap();
    let crawler = Arc::new(Crawler::new(github, store.clone(), status.clone()));

    let state = Arc::new(AppState {
        store,
        status,
        crawler,
    });
    (create_router(state.clone()), state)
}

async fn request_json(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Polls until the endpoint answers with the report array.
async fn poll_until_report(app: &Router, uri: &str) -> Value {
    for _ in 0..100 {
        let (status, body) = request_json(app, "GET", uri).await;
        assert_eq!(status, StatusCode::OK);
        if body.is_array() {
            return body;
        }
        assert_eq!(body["message"], "loading data");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("crawl did not finish in time");
}

/// Full octo fixture: org metadata, one member, one repo, one contributor.
async fn mount_octo(server: &MockServer, members_delay: Option<Duration>) {
    let base = server.uri();

    mount_org(server, "octo", 77).await;

    let mut members = page(json!([{"id": 2, "login": "u2"}]), None);
    if let Some(delay) = members_delay {
        members = members.set_delay(delay);
    }
    Mock::given(method("GET"))
        .and(path("/orgs/octo/public_members"))
        .respond_with(members)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgs/octo/repos"))
        .respond_with(page(json!([repo_json(&base, 101, "repo-a", 5, 1)]), None))
        .mount(server)
        .await;
    mount_contributors(
        server,
        101,
        json!([{"id": 1, "login": "u1", "contributions": 3}]),
    )
    .await;
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let (app, _state) = build_app(&server.uri());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_polling_lifecycle() {
    let server = MockServer::start().await;
    // Slow first stream so the in-progress state is observable.
    mount_octo(&server, Some(Duration::from_millis(200))).await;
    let (app, state) = build_app(&server.uri());

    // First contact claims the key, persists the org, and triggers the crawl.
    let (status, body) = request_json(&app, "GET", "/org/octo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "loading data");
    assert_eq!(body["org_id"], 77);

    // A poll while the crawl runs gets the same shape, org row now visible.
    let (status, body) = request_json(&app, "GET", "/org/octo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "loading data");
    assert_eq!(body["org_id"], 77);

    let report = poll_until_report(&app, "/org/octo").await;
    assert_eq!(
        report,
        json!([{"id": 101, "name": "repo-a", "stars": 5, "forks": 1, "contributions": 3}])
    );

    // Members landed too.
    let members = state.store.list_org_public_members(77).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, 2);
}

#[tokio::test]
async fn test_case_variants_resolve_to_one_organization() {
    let server = MockServer::start().await;
    mount_octo(&server, None).await;
    let (app, state) = build_app(&server.uri());

    let (status, body) = request_json(&app, "GET", "/org/Octo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["org_id"], 77);

    let report = poll_until_report(&app, "/org/OCTO").await;
    assert_eq!(report.as_array().unwrap().len(), 1);

    // One stored row serves every case variant.
    let org = state.store.get_organization_by_login("oCtO").unwrap().unwrap();
    assert_eq!(org.id, 77);
    assert_eq!(org.login, "octo");
}

#[tokio::test]
async fn test_unknown_upstream_org_is_404_and_retriable() {
    let server = MockServer::start().await;
    // No mocks mounted: the remote answers 404 for everything.
    let (app, state) = build_app(&server.uri());

    let (status, _) = request_json(&app, "GET", "/org/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The claim was released, so the key is back to unknown and a later
    // request goes upstream again instead of reporting a stuck crawl.
    assert_eq!(state.status.get("ghost"), None);
    let (status, _) = request_json(&app, "GET", "/org/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_crawl_surfaces_as_bad_gateway() {
    let server = MockServer::start().await;
    mount_org(&server, "octo", 77).await;
    // Org metadata resolves but every stream fetch blows up.
    Mock::given(method("GET"))
        .and(path("/orgs/octo/public_members"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let (app, _state) = build_app(&server.uri());

    let (status, _) = request_json(&app, "GET", "/org/octo").await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..100 {
        let (status, _) = request_json(&app, "GET", "/org/octo").await;
        if status == StatusCode::BAD_GATEWAY {
            return;
        }
        assert_eq!(status, StatusCode::OK);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("crawl failure never surfaced");
}

#[tokio::test]
async fn test_synchronous_crawl_by_id() {
    let server = MockServer::start().await;
    mount_octo(&server, None).await;
    let (app, state) = build_app(&server.uri());

    // The two-phase flow assumes the organization row already exists.
    state
        .store
        .create_organization(&Organization {
            id: 77,
            login: "octo".to_string(),
        })
        .unwrap();

    let (status, report) = request_json(&app, "POST", "/org/77").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        report,
        json!([{"id": 101, "name": "repo-a", "stars": 5, "forks": 1, "contributions": 3}])
    );

    // The synchronous path settles status too; a poll now sees the report.
    let (status, body) = request_json(&app, "GET", "/org/octo").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());

    let (status, _) = request_json(&app, "POST", "/org/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
