use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// JSON page response, with a `Link` next relation when `next` is given.
pub fn page(body: Value, next: Option<&str>) -> ResponseTemplate {
    let mut template = ResponseTemplate::new(200).set_body_json(body);
    if let Some(next) = next {
        let header = format!(r#"<{next}>; rel="next""#);
        template = template.insert_header("Link", header.as_str());
    }
    template
}

pub async fn mount_org(server: &MockServer, login: &str, id: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{login}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "login": login,
        })))
        .mount(server)
        .await;
}

/// A repository record as the listing endpoint returns it, with its
/// contributors cursor pointing back at the mock server.
pub fn repo_json(base_url: &str, id: i64, name: &str, stars: i64, forks: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "stargazers_count": stars,
        "forks_count": forks,
        "contributors_url": format!("{base_url}/repositories/{id}/contributors"),
    })
}

pub async fn mount_contributors(server: &MockServer, repo_id: i64, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repositories/{repo_id}/contributors")))
        .respond_with(page(body, None))
        .mount(server)
        .await;
}
