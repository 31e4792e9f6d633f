//! Exponential backoff for GitHub GETs.
//!
//! A failed attempt is retried while its error is transient and attempts
//! remain. When retrying stops, the last error is settled one of two ways: if
//! GitHub answered with a status, that status is the outcome; if nothing usable
//! came back, the error is. A 500 that persists therefore ends as
//! [`RetryOutcome::Answered`], not as a failure.
//!
//! The default schedule is 3 retries after 2s, 4s and 8s.

use std::future::Future;
use std::time::Duration;

use super::error::GitHubApiError;

/// Backoff schedule for transient failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Retries after the initial attempt.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Upper bound for any single delay.
    pub max_delay: Duration,

    /// Growth factor between consecutive delays.
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub const DEFAULT: Self = Self {
        max_retries: 3,
        initial_delay: Duration::from_secs(2),
        max_delay: Duration::from_secs(16),
        backoff_multiplier: 2.0,
    };

    /// Delay before retry number `retry` (0-indexed), capped at `max_delay`.
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let grown = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(retry as i32);
        Duration::from_secs_f64(grown.min(self.max_delay.as_secs_f64()))
    }

    /// Total attempts allowed under `policy`, the initial one included.
    fn attempts_under(&self, policy: RetryPolicy) -> u32 {
        match policy {
            RetryPolicy::RetryTransient => self.max_retries + 1,
            RetryPolicy::NoRetry => 1,
        }
    }
}

/// Whether transient failures are retried at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    RetryTransient,
    NoRetry,
}

/// How a retried GET settled.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// An attempt succeeded.
    Success(T),

    /// GitHub's last answer was this non-200 status.
    Answered { status: u16, attempts: u32 },

    /// No attempt got a usable answer.
    Failed { error: GitHubApiError, attempts: u32 },
}

impl<T> RetryOutcome<T> {
    /// Settles a failed attempt that will not be retried.
    fn settle(error: GitHubApiError, attempts: u32) -> Self {
        match error.status_code {
            Some(status) => RetryOutcome::Answered { status, attempts },
            None => RetryOutcome::Failed { error, attempts },
        }
    }
}

/// Runs `operation` until it succeeds or its error is settled.
pub async fn retry_with_backoff<T, F, Fut>(
    config: RetryConfig,
    policy: RetryPolicy,
    mut operation: F,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GitHubApiError>>,
{
    let max_attempts = config.attempts_under(policy);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let error = match operation().await {
            Ok(value) => return RetryOutcome::Success(value),
            Err(error) => error,
        };

        if !error.kind.is_retriable() || attempt >= max_attempts {
            return RetryOutcome::settle(error, attempt);
        }

        let delay = config.delay_for_attempt(attempt - 1);
        tracing::warn!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "transient GitHub API error, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
