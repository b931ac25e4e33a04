//! GitHub client — the profile data fetcher.
//!
//! Pure I/O and parsing: one lookup for the user profile, one for up to 100 of the
//! user's repositories ordered by most recent update. No caching, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::repository::RepositoryRecord;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
/// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const REPOS_PER_PAGE: &str = "100";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub username is required")]
    MissingUsername,

    #[error("404 Not Found for {0}")]
    NotFound(String),

    #[error("GitHub returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON response from GitHub API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid GitHub API URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// The two lookups the pipeline needs from a hosting provider.
///
/// Carried in `AppState` as `Arc<dyn ProfileSource>` so handlers and the pipeline can
/// be exercised without network access.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Raw user profile record, passed through to the response untouched.
    async fn fetch_user(&self, username: &str) -> Result<Value, FetchError>;

    async fn fetch_repos(&self, username: &str) -> Result<Vec<RepositoryRecord>, FetchError>;
}

/// Everything fetched for one username.
#[derive(Debug, Clone)]
pub struct FetchedProfile {
    pub user_data: Value,
    pub repos: Vec<RepositoryRecord>,
}

/// Validates the username, then issues both lookups concurrently.
///
/// An empty or whitespace-only username fails before any request is sent.
pub async fn fetch_profile(
    source: &dyn ProfileSource,
    username: &str,
) -> Result<FetchedProfile, FetchError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(FetchError::MissingUsername);
    }

    let (user_data, repos) =
        tokio::try_join!(source.fetch_user(username), source.fetch_repos(username))?;

    info!("Fetched {} repositories for {username}", repos.len());

    Ok(FetchedProfile { user_data, repos })
}

/// REST client for the GitHub API.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            token,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", self.api_url)))?;

        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        debug!("GET {url} with query {query:?}");

        let path = url.path().to_string();
        let mut request = self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT, "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GitHubErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ProfileSource for GitHubClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_user(&self, username: &str) -> Result<Value, FetchError> {
        let url = self.endpoint(&["users", username])?;
        self.get_json(url, &[]).await
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_repos(&self, username: &str) -> Result<Vec<RepositoryRecord>, FetchError> {
        let url = self.endpoint(&["users", username, "repos"])?;
        self.get_json(url, &[("sort", "updated"), ("per_page", REPOS_PER_PAGE)])
            .await
    }
}

/// In-memory `ProfileSource` that records how often it was called.
#[cfg(test)]
pub(crate) mod stub {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    pub struct StubSource {
        pub user: Value,
        pub repos: Vec<RepositoryRecord>,
        pub user_missing: bool,
        pub repos_status: Option<u16>,
        pub calls: AtomicUsize,
        pub usernames: Mutex<Vec<String>>,
    }

    impl StubSource {
        pub fn new(repos: Vec<RepositoryRecord>) -> Self {
            Self {
                user: serde_json::json!({ "login": "octocat", "name": "The Octocat" }),
                repos,
                user_missing: false,
                repos_status: None,
                calls: AtomicUsize::new(0),
                usernames: Mutex::new(Vec::new()),
            }
        }

        pub fn missing_user() -> Self {
            Self {
                user_missing: true,
                ..Self::new(vec![])
            }
        }

        /// The repository listing answers with a non-404 error status.
        pub fn failing_repos(status: u16) -> Self {
            Self {
                repos_status: Some(status),
                ..Self::new(vec![])
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requested_usernames(&self) -> Vec<String> {
            self.usernames.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProfileSource for StubSource {
        async fn fetch_user(&self, username: &str) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.usernames.lock().unwrap().push(username.to_string());
            if self.user_missing {
                return Err(FetchError::NotFound(format!("/users/{username}")));
            }
            Ok(self.user.clone())
        }

        async fn fetch_repos(&self, _username: &str) -> Result<Vec<RepositoryRecord>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.repos_status {
                return Err(FetchError::Status {
                    status,
                    message: "API rate limit exceeded".to_string(),
                });
            }
            Ok(self.repos.clone())
        }
    }
}
