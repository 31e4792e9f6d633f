//! Memoized existence checks for owners, repositories and releases.
//!
//! The checks are pure queries: a missing resource is reported as
//! [`Existence::NotFound`], never as an error. Whether a missing resource
//! should fail a run is decided by the caller.

use std::fmt;

use thiserror::Error;

use crate::github::GitHubApiError;

pub mod cache;
pub mod service;

pub use cache::{CacheKey, ExistenceCache};
pub use service::ExistenceService;

/// The answer to an existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Existence {
    Found,
    NotFound,
}

impl Existence {
    pub fn is_found(self) -> bool {
        matches!(self, Existence::Found)
    }
}

impl From<bool> for Existence {
    fn from(found: bool) -> Self {
        if found {
            Existence::Found
        } else {
            Existence::NotFound
        }
    }
}

impl fmt::Display for Existence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Existence::Found => write!(f, "found"),
            Existence::NotFound => write!(f, "not found"),
        }
    }
}

/// Errors raised by the existence checks.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A required input was empty. Raised before any request is made.
    #[error("the '{param}' value cannot be empty")]
    InvalidArgument { param: &'static str },

    /// The transport failed to get an answer from GitHub.
    #[error(transparent)]
    Transport(#[from] GitHubApiError),

    /// The service was used after being disposed.
    #[error("the GitHub data service has been disposed")]
    Disposed,
}

/// Result type for existence checks.
pub type Result<T> = std::result::Result<T, CheckError>;

/// Fails with [`CheckError::InvalidArgument`] if `value` is empty.
pub(crate) fn require_non_empty(param: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CheckError::InvalidArgument { param });
    }
    Ok(())
}
