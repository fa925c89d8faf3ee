pub mod sync;

pub use sync::{run_sync, spawn_sync, sync_all, Page, PageSource, ProfileSource, SyncEvent, SyncOutcome};

use crate::config::Config;
use crate::data::{Profile, Repo};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repositories requested per listing page.
pub const LISTING_PAGE_SIZE: usize = 100;

/// Shared HTTP client for all API requests to enable connection pooling
pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(5)
        .build()
        .expect("Failed to create HTTP client")
});

/// Failure of a single API call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Non-2xx response. The message is the server-supplied `message` field
    /// when the body is JSON, otherwise the raw status line.
    #[error("GitHub API error {status}: {message}")]
    Status { status: u16, message: String },
    /// Network-level failure before any status was received.
    #[error("network error: {0}")]
    Network(String),
    /// The response decoded, but not into the shape a listing must have.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// Build an `ApiError::Status` from a non-success response, preferring the
/// JSON body's `message` field over the bare status line.
pub async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let fallback = status.to_string();
    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(fallback),
        Err(_) => fallback,
    };
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Extract the `rel="next"` URL from an RFC 5988 `Link` header.
///
/// Entries look like `<https://...?page=2>; rel="next"`, comma-separated.
/// Returns `None` when there is no next relation or the header is malformed,
/// which ends the paged fetch loop.
pub fn parse_next_link(header: &str) -> Option<String> {
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let url = parts.next()?.trim();
        if !url.starts_with('<') || !url.ends_with('>') {
            continue;
        }
        let is_next = parts
            .any(|param| matches!(param.trim(), r#"rel="next""# | "rel=next"));
        if is_next {
            return Some(url[1..url.len() - 1].to_string());
        }
    }
    None
}

/// Wire shape of one repository record in a listing response.
#[derive(Debug, Deserialize)]
struct RepoRecord {
    id: u64,
    name: String,
    full_name: String,
    description: Option<String>,
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    language: Option<String>,
    private: bool,
    fork: bool,
    updated_at: DateTime<Utc>,
    owner: OwnerRecord,
}

#[derive(Debug, Deserialize)]
struct OwnerRecord {
    login: String,
}

impl From<RepoRecord> for Repo {
    fn from(r: RepoRecord) -> Self {
        Repo {
            id: r.id,
            name: r.name,
            full_name: r.full_name,
            description: r.description,
            html_url: r.html_url,
            stargazers_count: r.stargazers_count,
            forks_count: r.forks_count,
            language: r.language,
            private: r.private,
            fork: r.fork,
            updated_at: r.updated_at,
            owner: r.owner.login,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
}

/// Authenticated GitHub API client. The token is passed in explicitly at
/// construction; nothing here reads ambient state.
#[derive(Debug, Clone)]
pub struct GithubClient {
    token: String,
    api_url: String,
}

impl GithubClient {
    pub fn new(config: &Config) -> Self {
        Self {
            token: config.github.token.clone(),
            api_url: config
                .github
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        HTTP_CLIENT
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "reposweep")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Delete one repository (`DELETE /repos/{owner}/{name}`).
    pub async fn delete_repo(&self, owner: &str, name: &str) -> Result<(), ApiError> {
        let url = format!(
            "{}/repos/{}/{}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(name)
        );
        let response = self.request(reqwest::Method::DELETE, &url).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}

impl ProfileSource for GithubClient {
    /// Fetch the authenticated user's profile (`GET /user`).
    async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let url = format!("{}/user", self.api_url);
        let response = self.request(reqwest::Method::GET, &url).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let record: ProfileRecord = response.json().await?;
        Ok(Profile {
            login: record.login,
            name: record.name,
            avatar_url: record.avatar_url,
        })
    }
}

impl PageSource for GithubClient {
    fn first_page_url(&self) -> String {
        format!(
            "{}/user/repos?per_page={}&sort=updated&type=owner",
            self.api_url, LISTING_PAGE_SIZE
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<Page, ApiError> {
        let response = self.request(reqwest::Method::GET, url).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        // Read the continuation cursor before the body consumes the response.
        let next_url = response
            .headers()
            .get("link")
            .and_then(|h| h.to_str().ok())
            .and_then(parse_next_link);

        let body: serde_json::Value = response.json().await?;
        if !body.is_array() {
            return Err(ApiError::Shape("listing response is not an array".into()));
        }

        let records: Vec<RepoRecord> = serde_json::from_value(body)
            .map_err(|e| ApiError::Shape(e.to_string()))?;

        Ok(Page {
            repos: records.into_iter().map(Repo::from).collect(),
            next_url,
        })
    }
}
