//! Retry executor with configurable backoff

use crate::error::{Error, Result};
use crate::types::BackoffType;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Retry limit and backoff curve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub retry_limit: u32,
    /// Wait before the first retry
    pub initial_wait: Duration,
    /// Upper bound for any single wait
    pub max_wait: Duration,
    /// Backoff curve
    pub backoff: BackoffType,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_limit: 5,
            initial_wait: Duration::from_millis(1000),
            max_wait: Duration::from_millis(120_000),
            backoff: BackoffType::Exponential,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with exponential backoff
    pub fn new(retry_limit: u32, initial_wait: Duration, max_wait: Duration) -> Self {
        Self {
            retry_limit,
            initial_wait,
            max_wait,
            backoff: BackoffType::Exponential,
        }
    }

    /// Set the backoff curve
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffType) -> Self {
        self.backoff = backoff;
        self
    }

    /// Wait before the given retry; `retry_count` starts at 1
    pub fn wait_for(&self, retry_count: u32) -> Duration {
        let delay = match self.backoff {
            BackoffType::Constant => self.initial_wait,
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(retry_count.saturating_sub(1));
                self.initial_wait.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.max_wait)
    }
}

/// Receives retry events for diagnostics
pub trait RetryObserver: Send + Sync {
    /// Called before sleeping ahead of retry number `retry_count`
    fn on_retry(&self, error: &Error, retry_count: u32, retry_limit: u32, wait: Duration);

    /// Called once when the retry limit is exhausted
    fn on_give_up(&self, first_error: &Error, last_error: &Error);
}

/// Observer that reports through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRetryObserver;

impl RetryObserver for LoggingRetryObserver {
    fn on_retry(&self, error: &Error, retry_count: u32, retry_limit: u32, wait: Duration) {
        let seconds = wait.as_secs();
        match error {
            Error::Api { status, .. } => warn!(
                "Retrying {retry_count}/{retry_limit} after {seconds} seconds. HTTP status code: {status}"
            ),
            other => warn!(
                "Retrying {retry_count}/{retry_limit} after {seconds} seconds. Message: {}",
                other.detail()
            ),
        }
    }

    fn on_give_up(&self, _first_error: &Error, _last_error: &Error) {
        warn!("Retry Limit Exceeded");
    }
}

/// Runs fallible operations under a `RetryPolicy`
#[derive(Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
}

impl RetryExecutor {
    /// Create an executor that logs retries
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_observer(policy, Arc::new(LoggingRetryObserver))
    }

    /// Create an executor with a custom observer
    pub fn with_observer(policy: RetryPolicy, observer: Arc<dyn RetryObserver>) -> Self {
        Self { policy, observer }
    }

    /// The policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds or gives up
    ///
    /// Non-retryable errors are returned unchanged. Once `retry_limit`
    /// retries have failed, the last error is wrapped in
    /// `Error::RetryExhausted`. Dropping the returned future cancels any
    /// pending wait.
    pub async fn run<T, F, Fut, R>(&self, mut operation: F, is_retryable: R) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        R: Fn(&Error) -> bool,
    {
        let retry_limit = self.policy.retry_limit;
        let mut retry_count = 0;
        let mut first_error: Option<Error> = None;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !is_retryable(&error) {
                return Err(error);
            }

            if retry_count >= retry_limit {
                self.observer
                    .on_give_up(first_error.as_ref().unwrap_or(&error), &error);
                return Err(Error::RetryExhausted {
                    retries: retry_count,
                    source: Box::new(error),
                });
            }

            retry_count += 1;
            let wait = self.policy.wait_for(retry_count);
            self.observer
                .on_retry(&error, retry_count, retry_limit, wait);

            if first_error.is_none() {
                first_error = Some(error);
            }

            tokio::time::sleep(wait).await;
        }
    }
}

impl std::fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
