//! HTTP transport module
//!
//! Provides the authenticated JSON transport used for every JIRA call.
//!
//! # Features
//!
//! - **Authentication**: `Authorization` header on every request
//! - **Error Extraction**: JIRA `errorMessages` are lifted into `Error::Api`
//! - **Timeouts**: bounded connect and request timeouts
//! - **Rate Limiting**: optional token bucket limiter using governor

mod rate_limit;
mod transport;

pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{extract_error_messages, HttpTransport, HttpTransportConfig};
