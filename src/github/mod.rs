//! GitHub REST API transport.
//!
//! This module provides the [`Transport`] seam used by the existence checks and
//! its octocrab-backed implementation.
//!
//! Key features:
//! - Exponential backoff retry for transient failures
//! - Distinguishes transient vs permanent errors
//! - Every non-200 status is reported as GitHub's answer, not as an error

mod client;
mod error;
mod retry;
mod transport;

pub use client::{ACCEPT_MEDIA_TYPE, GITHUB_API_BASE, OctocrabClient};
pub use error::{GitHubApiError, GitHubErrorKind};
pub use retry::{RetryConfig, RetryOutcome, RetryPolicy, retry_with_backoff};
pub use transport::{
    STATUS_OK, Transport, TransportResponse, owner_path, releases_path, repo_path,
};
