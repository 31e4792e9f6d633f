//! GitHub API error types.
//!
//! A GET can end in three ways: a 200 with a body, an HTTP status GitHub
//! answered with, or a fault where no usable answer came back. This module
//! classifies the last two so the transport knows what to retry:
//!
//! - **Transient**: 5xx, 429, rate-limited 403, connection and I/O failures
//! - **Permanent**: every other status, undecodable bodies, malformed requests
//!
//! Whether an error carries a status decides what it becomes once retrying
//! stops: a status is GitHub's answer and is reported as such, a fault without
//! one is returned as an error.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Whether retrying a failed request can change the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubErrorKind {
    /// The server or the network may recover: 5xx, 429, a rate-limited 403,
    /// refused connections, timeouts.
    Transient,

    /// Asking again gets the same answer: 404, 401, a body that does not
    /// match the expected model.
    Permanent,
}

impl GitHubErrorKind {
    /// Returns true if this error is retriable.
    pub fn is_retriable(&self) -> bool {
        matches!(self, GitHubErrorKind::Transient)
    }
}

/// A failed GET, with what GitHub answered if it answered at all.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    pub kind: GitHubErrorKind,

    /// The HTTP status GitHub answered with. `None` when no response arrived
    /// or the response could not be read.
    pub status_code: Option<u16>,

    /// A single-line description, e.g. GitHub's `message` field.
    pub message: String,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl GitHubApiError {
    /// A non-200 answer. `message` is GitHub's explanation, used to tell a
    /// rate-limited 403 from a plain one.
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: categorize_status(status_code, &message),
            status_code: Some(status_code),
            message,
            source: None,
        }
    }

    /// A 200 whose body does not deserialize into the expected model.
    pub fn undecodable(route: &str, err: &serde_json::Error) -> Self {
        Self {
            kind: GitHubErrorKind::Permanent,
            status_code: None,
            message: format!("unexpected response body from {route}: {err}"),
            source: None,
        }
    }

    /// A request that produced no readable response.
    ///
    /// Connection, TLS, timeout and body-read failures surface from octocrab's
    /// service stack as `Service` or `Hyper` and are worth another attempt.
    /// Anything else is a malformed request and is not.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let kind = match &err {
            octocrab::Error::Service { .. } | octocrab::Error::Hyper { .. } => {
                GitHubErrorKind::Transient
            }
            _ => GitHubErrorKind::Permanent,
        };

        Self {
            kind,
            status_code: None,
            message: describe(&err),
            source: Some(err),
        }
    }
}

/// Renders an octocrab error as one line built from its cause chain.
///
/// octocrab's own `Display` appends a captured backtrace, which must not reach
/// a workflow annotation.
fn describe(err: &octocrab::Error) -> String {
    let mut causes = Vec::new();
    let mut cause = err.source();
    while let Some(inner) = cause {
        causes.push(inner.to_string());
        cause = inner.source();
    }

    if causes.is_empty() {
        let rendered = err.to_string();
        rendered.lines().next().unwrap_or_default().trim().to_string()
    } else {
        causes.join(": ")
    }
}

fn categorize_status(status_code: u16, message: &str) -> GitHubErrorKind {
    match status_code {
        429 => GitHubErrorKind::Transient,
        403 if is_rate_limit_message(message) => GitHubErrorKind::Transient,
        500..=599 => GitHubErrorKind::Transient,
        _ => GitHubErrorKind::Permanent,
    }
}

/// GitHub's wording for primary and secondary rate limits.
fn is_rate_limit_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("rate limit") || message.contains("abuse detection")
}
