//! The transport seam between the existence checks and the GitHub REST API.
//!
//! A transport performs one GET per call and reports what GitHub answered.
//! Any non-200 answer, a 404 or a 500 that outlived its retries alike, comes
//! back as a status with no body. Only faults where no usable answer arrived
//! (network failures, undecodable bodies) are errors.
//!
//! The trait-based design lets tests script responses without a network.

use std::future::Future;

use serde::de::DeserializeOwned;

use super::error::GitHubApiError;

/// The HTTP status code for a successful GET.
pub const STATUS_OK: u16 = 200;

/// What GitHub answered for a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse<T> {
    /// The HTTP status code.
    pub status: u16,

    /// The deserialized body, present only for successful responses.
    pub data: Option<T>,
}

impl<T> TransportResponse<T> {
    /// A 200 response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: STATUS_OK,
            data: Some(data),
        }
    }

    /// A response with no usable body.
    pub fn status_only(status: u16) -> Self {
        Self { status, data: None }
    }

    /// Returns the body if the status is 200 and a body is present.
    pub fn into_ok_data(self) -> Option<T> {
        if self.status == STATUS_OK {
            self.data
        } else {
            None
        }
    }
}

/// Issues GET requests against the GitHub REST API.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct NotFoundTransport;
///
/// impl Transport for NotFoundTransport {
///     async fn get<T>(&self, _path: &str) -> Result<TransportResponse<T>, GitHubApiError>
///     where
///         T: DeserializeOwned + Send + 'static,
///     {
///         Ok(TransportResponse::status_only(404))
///     }
/// }
/// ```
pub trait Transport {
    /// GETs `path`, relative to the API root, deserializing a 200 body as `T`.
    fn get<T>(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<TransportResponse<T>, GitHubApiError>> + Send
    where
        T: DeserializeOwned + Send + 'static;

    /// Releases the transport. Called exactly once, when its owner is disposed.
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Path of the user/organization resource for `owner`.
pub fn owner_path(owner: &str) -> String {
    format!("users/{}", urlencoding::encode(owner))
}

/// Path of the repository resource for `owner/repo`.
pub fn repo_path(owner: &str, repo: &str) -> String {
    format!(
        "repos/{}/{}",
        urlencoding::encode(owner),
        urlencoding::encode(repo)
    )
}

/// Path of the releases list for `owner/repo`.
pub fn releases_path(owner: &str, repo: &str) -> String {
    format!("{}/releases", repo_path(owner, repo))
}
