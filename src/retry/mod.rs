//! Retry module
//!
//! Bounded retry with backoff around any fallible async operation.
//!
//! # Overview
//!
//! - `RetryPolicy` - retry limit and the backoff curve
//! - `RetryExecutor` - runs an operation until it succeeds, fails with a
//!   non-retryable error, or exhausts the retry limit
//! - `RetryObserver` - receives retry and give-up events

mod executor;

pub use executor::{LoggingRetryObserver, RetryExecutor, RetryObserver, RetryPolicy};
