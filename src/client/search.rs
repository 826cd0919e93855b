//! JIRA REST client
//!
//! Wraps the transport with the JIRA-specific endpoints, request bodies and
//! error semantics.

use super::types::{Issue, Page};
use crate::auth::Credentials;
use crate::config::{JiraConfig, MIN_RESULTS};
use crate::error::{Error, Result};
use crate::http::{HttpTransport, HttpTransportConfig, RateLimiterConfig};
use crate::pagination::{next_cursor, Cursor, PaginationMode};
use crate::retry::{LoggingRetryObserver, RetryExecutor, RetryObserver};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

const PERMISSION_PATH: &str = "/rest/api/latest/myself";
const SEARCH_PATH: &str = "/rest/api/latest/search/jql";

const UNAUTHORIZED: &str = "Could not authorize with your credential.";
const CONTACT_FAILED: &str =
    "Could not authorize with your credential due to problems when contacting JIRA API.";

/// URL of the credential check endpoint
///
/// The path is appended verbatim, so a trailing slash on `uri` yields `//`.
pub fn build_permission_url(uri: &str) -> String {
    format!("{uri}{PERMISSION_PATH}")
}

/// URL of the issue search endpoint
pub fn build_search_url(uri: &str) -> String {
    format!("{uri}{SEARCH_PATH}")
}

/// Client for the JIRA search API
#[derive(Debug)]
pub struct JiraClient {
    transport: HttpTransport,
    retry: RetryExecutor,
    uri: String,
    jql: String,
    expand: Vec<String>,
}

impl JiraClient {
    /// Create a client that logs retries
    pub fn new(config: &JiraConfig) -> Result<Self> {
        Self::with_observer(config, Arc::new(LoggingRetryObserver))
    }

    /// Create a client with a custom retry observer
    pub fn with_observer(config: &JiraConfig, observer: Arc<dyn RetryObserver>) -> Result<Self> {
        let credentials = Credentials::new(
            config.auth_method,
            config.username.clone(),
            config.password.clone(),
        );

        let mut transport_config = HttpTransportConfig::default().with_timeout(config.timeout());
        if let Some(rps) = config.max_requests_per_second {
            transport_config = transport_config.with_rate_limit(RateLimiterConfig::per_second(rps));
        }

        Ok(Self {
            transport: HttpTransport::with_config(credentials, transport_config)?,
            retry: RetryExecutor::with_observer(config.retry_policy(), observer),
            uri: config.uri.clone(),
            jql: config.jql(),
            expand: config.expand.clone(),
        })
    }

    /// Verify the credentials against the permission endpoint
    ///
    /// A single attempt, no retries. 401 means the credentials are wrong;
    /// anything else means JIRA could not be reached properly.
    pub async fn check_credentials(&self) -> Result<()> {
        match self.transport.get(&build_permission_url(&self.uri)).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let status = e.status_code().unwrap_or(-1);
                error!("JIRA return status ({status}), reason ({})", e.detail());
                if status == 401 {
                    Err(Error::credential(UNAUTHORIZED))
                } else {
                    Err(Error::credential(CONTACT_FAILED))
                }
            }
        }
    }

    /// Fetch one page of issues starting at `cursor`
    pub async fn search(&self, cursor: &Cursor, max_results: u32) -> Result<Page> {
        let mut response = self.search_api(cursor, max_results).await?;

        let entries = match response.get_mut("issues").map(Value::take) {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(Error::config(
                    "Unexpected search response: missing 'issues' array",
                ))
            }
        };

        let mut issues = Vec::with_capacity(entries.len());
        for entry in entries {
            match Issue::from_json(entry) {
                Some(issue) => issues.push(issue),
                None => warn!("Skipping search result entry that is not an object"),
            }
        }

        let next = next_cursor(&response, cursor, max_results, issues.len());
        let total = PaginationMode::detect(&response).total();
        debug!(
            "Fetched {} issues at {:?}, next {:?}, total {:?}",
            issues.len(),
            cursor,
            next,
            total
        );

        Ok(Page {
            issues,
            next,
            total,
        })
    }

    /// Total matching issues, `None` when the server uses token paging
    pub async fn get_total_count(&self) -> Result<Option<u64>> {
        let response = self.search_api(&Cursor::Start, MIN_RESULTS).await?;
        Ok(PaginationMode::detect(&response).total())
    }

    /// Request body for a search call
    pub fn search_body(&self, cursor: &Cursor, max_results: u32) -> Value {
        let mut body = Map::new();
        body.insert("jql".to_string(), Value::from(self.jql.as_str()));
        cursor.apply(&mut body);
        body.insert("maxResults".to_string(), Value::from(max_results));
        body.insert("fields".to_string(), Value::from(vec!["*all"]));
        body.insert("expand".to_string(), Value::from(self.expand.clone()));
        Value::Object(body)
    }

    /// POST a search under the retry policy and parse the response
    async fn search_api(&self, cursor: &Cursor, max_results: u32) -> Result<Value> {
        let url = build_search_url(&self.uri);
        let body = self.search_body(cursor, max_results);

        let text = self
            .retry
            .run(|| self.transport.post(&url, &body), Error::is_retryable)
            .await
            .map_err(into_config_error)?;

        Ok(serde_json::from_str(&text)?)
    }
}

/// Terminal search failures surface as configuration errors with the server's message
fn into_config_error(error: Error) -> Error {
    match error {
        Error::RetryExhausted { source, .. } => into_config_error(*source),
        Error::Api { message, .. } | Error::Transport { message } => Error::config(message),
        other => other,
    }
}
