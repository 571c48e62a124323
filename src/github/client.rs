use std::marker::PhantomData;
use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;

use super::link::RelLinks;
use super::records::OrgRecord;
use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Client for the remote organization API. Cheap to clone; the underlying
/// connection pool is shared.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
}

/// One fetched page: the decoded items plus the URL of the next page, if the
/// response advertised one.
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl GithubClient {
    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::Config("API token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(concat!("orgscope/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn org_repos_url(&self, login: &str) -> String {
        format!("{}/orgs/{}/repos", self.base_url, login)
    }

    pub fn org_public_members_url(&self, login: &str) -> String {
        format!("{}/orgs/{}/public_members", self.base_url, login)
    }

    /// Fetches minimal metadata for one organization. A 404 from the remote
    /// maps to [`Error::NotFound`] so callers can distinguish "no such
    /// organization upstream" from transport failure.
    pub async fn get_org(&self, login: &str) -> Result<OrgRecord> {
        let url = format!("{}/orgs/{}", self.base_url, login);
        let resp = self.client.get(&url).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(Error::NotFound),
            status if status.is_success() => Ok(resp.json().await?),
            status => Err(Error::FetchStatus {
                url,
                status: status.as_u16(),
            }),
        }
    }

    /// One network round trip: decodes the JSON array body and extracts the
    /// pagination cursor from the `Link` header. No retry logic lives here.
    pub async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let links = resp
            .headers()
            .get(header::LINK)
            .and_then(|value| value.to_str().ok())
            .map(RelLinks::parse)
            .unwrap_or_default();
        let items = resp.json().await?;

        Ok(Page {
            items,
            next: links.next,
        })
    }

    /// Cursor walker over a paginated collection, starting at `start_url`.
    pub fn pages<T: DeserializeOwned>(&self, start_url: String) -> PageStream<'_, T> {
        PageStream {
            client: self,
            next: Some(start_url),
            _items: PhantomData,
        }
    }
}

/// Explicit cursor loop over a paginated collection. Each `next_page` call is
/// one fetch; the stream is exhausted once the remote stops returning a
/// `next` relation.
pub struct PageStream<'a, T> {
    client: &'a GithubClient,
    next: Option<String>,
    _items: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> PageStream<'_, T> {
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };
        let page = self.client.fetch_page::<T>(&url).await?;
        self.next = page.next;
        Ok(Some(page.items))
    }
}
