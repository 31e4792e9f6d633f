//! Octocrab-backed transport for the GitHub REST API.
//!
//! This module provides `OctocrabClient`, which wraps an `Octocrab` instance
//! and implements [`Transport`]. Each GET reads the raw response so every
//! status reaches the caller: a 200 body is decoded, any other status is
//! GitHub's answer, and only requests with no readable response are errors.

use http::header::ACCEPT;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig as ServiceRetry;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::GitHubApiError;
use super::retry::{RetryConfig, RetryOutcome, RetryPolicy, retry_with_backoff};
use super::transport::{STATUS_OK, Transport, TransportResponse};

/// The public GitHub REST API root.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Media type sent in the `Accept` header of every request.
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Body GitHub sends with error statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// A GitHub API client used as the existence checks' transport.
#[derive(Clone)]
pub struct OctocrabClient {
    client: Octocrab,
    retry_config: RetryConfig,
    retry_policy: RetryPolicy,
}

impl OctocrabClient {
    /// Builds a client for the API rooted at `base_url`.
    ///
    /// Requests are anonymous unless a token is given. Anonymous requests work
    /// for public repositories but are subject to a much lower rate limit.
    /// octocrab's own service-level retry is off; [`retry_with_backoff`] is the
    /// only retry layer.
    pub fn connect(base_url: &str, token: Option<String>) -> Result<Self, GitHubApiError> {
        let mut builder = Octocrab::builder()
            .add_retry_config(ServiceRetry::None)
            .base_uri(base_url.trim_end_matches('/'))
            .map_err(GitHubApiError::from_octocrab)?
            .add_header(ACCEPT, ACCEPT_MEDIA_TYPE.to_string());

        if let Some(token) = token {
            builder = builder.personal_token(token);
        }

        Ok(Self {
            client: builder.build().map_err(GitHubApiError::from_octocrab)?,
            retry_config: RetryConfig::DEFAULT,
            retry_policy: RetryPolicy::RetryTransient,
        })
    }

    /// Replaces the retry behavior for transient failures.
    pub fn with_retry(mut self, config: RetryConfig, policy: RetryPolicy) -> Self {
        self.retry_config = config;
        self.retry_policy = policy;
        self
    }

    /// Performs a single GET. A non-200 status comes back as an error carrying
    /// that status so the retry loop can decide whether to ask again.
    async fn fetch<T>(&self, route: &str) -> Result<T, GitHubApiError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            ._get(route)
            .await
            .map_err(GitHubApiError::from_octocrab)?;
        let status = response.status();
        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(GitHubApiError::from_octocrab)?;

        if status.as_u16() != STATUS_OK {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|error| error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or_default().to_string());
            return Err(GitHubApiError::from_status(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| GitHubApiError::undecodable(route, &e))
    }
}

impl Transport for OctocrabClient {
    async fn get<T>(&self, path: &str) -> Result<TransportResponse<T>, GitHubApiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let route = api_route(path);
        tracing::debug!(route = %route, "GET");

        match retry_with_backoff(self.retry_config, self.retry_policy, || self.fetch(&route)).await
        {
            RetryOutcome::Success(data) => Ok(TransportResponse::ok(data)),
            RetryOutcome::Answered { status, attempts } => {
                tracing::debug!(route = %route, status, attempts, "GitHub answered without a resource");
                Ok(TransportResponse::status_only(status))
            }
            RetryOutcome::Failed { error, attempts } => {
                tracing::debug!(route = %route, attempts, error = %error, "GET failed");
                Err(error)
            }
        }
    }

    fn close(self) {
        tracing::debug!("releasing GitHub API client");
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient")
            .field("retry_config", &self.retry_config)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

/// Turns a path relative to the API root into an absolute route.
fn api_route(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}
