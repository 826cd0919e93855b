//! Authenticated JSON transport
//!
//! Each call sends one request and reads the whole body. The client keeps no
//! idle connections, so every call opens its own connection and releases it
//! when the response is dropped, on success and on error alike.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::Credentials;
use crate::error::{Error, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const JSON: &str = "application/json";

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Connect and request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            rate_limit: None,
            user_agent: format!("jira-extract/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpTransportConfig {
    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the rate limiter
    #[must_use]
    pub fn with_rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }
}

/// Authenticated HTTP transport for the JIRA REST API
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
    rate_limiter: Option<RateLimiter>,
}

impl HttpTransport {
    /// Create a transport with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, HttpTransportConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(credentials: Credentials, config: HttpTransportConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .cookie_store(true)
            .pool_max_idle_per_host(0)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {e}")))?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            credentials,
            rate_limiter,
        })
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<String> {
        self.request(Method::GET, url, None).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, url: &str, body: &Value) -> Result<String> {
        self.request(Method::POST, url, Some(body)).await
    }

    /// Send a request and return the body of a 200 response
    ///
    /// Any other status becomes `Error::Api` carrying the server's
    /// `errorMessages`; failures before a response arrives become
    /// `Error::Transport`.
    pub async fn request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<String> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self
            .client
            .request(method.clone(), url)
            .header(AUTHORIZATION, self.credentials.authorization_header())
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON);

        if let Some(body) = body {
            req = req.body(body.to_string());
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        if status != StatusCode::OK {
            debug!("{} {} failed with {}", method, url, status.as_u16());
            return Err(Error::api(
                i32::from(status.as_u16()),
                extract_error_messages(&text),
            ));
        }

        debug!("Request succeeded: {} {}", method, url);
        Ok(text)
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("credentials", &self.credentials)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Join JIRA's `errorMessages` with `" , "`, or fall back to the raw body
pub fn extract_error_messages(body: &str) -> String {
    let messages = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        json.get("errorMessages")?
            .as_array()?
            .iter()
            .map(|m| m.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
    });

    match messages {
        Some(messages) => messages.join(" , "),
        None => body.to_string(),
    }
}
