//! Extractor configuration
//!
//! The configuration is loaded from YAML and validated before any network
//! call is made.

use crate::auth::AuthMethod;
use crate::convert::parse_timezone;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::schema::{Column, Schema, DEFAULT_TIMESTAMP_FORMAT, DEFAULT_TIMEZONE};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Number of issues requested per search call
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Page size used by the total-count probe
pub const MIN_RESULTS: u32 = 1;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete extractor configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    /// JIRA endpoint, e.g. `https://example.atlassian.net`
    pub uri: String,

    /// Username or email
    pub username: String,

    /// Password or API token
    pub password: String,

    /// How credentials are sent
    #[serde(default)]
    pub auth_method: AuthMethod,

    /// JQL filter
    #[serde(default)]
    pub jql: Option<String>,

    /// Entities to expand in search results
    #[serde(default)]
    pub expand: Vec<String>,

    /// Retries after the first failed attempt
    #[serde(default = "default_retry_limit")]
    pub retry_limit: i64,

    /// Wait before the first retry
    #[serde(default = "default_initial_retry_interval")]
    pub initial_retry_interval_millis: i64,

    /// Upper bound for the wait between retries
    #[serde(default = "default_maximum_retry_interval")]
    pub maximum_retry_interval_millis: i64,

    /// Issues requested per search call
    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Connect/read/request timeout
    #[serde(default = "default_timeout")]
    pub timeout_millis: u64,

    /// Client-side throttle, unlimited when unset
    #[serde(default)]
    pub max_requests_per_second: Option<u32>,

    /// Infer the schema from a sample page instead of `columns`
    #[serde(default)]
    pub dynamic_schema: bool,

    /// Static output schema
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Timezone for timestamp columns that set none
    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    /// Pattern for timestamp columns that set none
    #[serde(default = "default_timestamp_format")]
    pub default_timestamp_format: String,
}

fn default_retry_limit() -> i64 {
    5
}

fn default_initial_retry_interval() -> i64 {
    1000
}

fn default_maximum_retry_interval() -> i64 {
    120_000
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout() -> u64 {
    300_000
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl JiraConfig {
    /// Create a config with defaults for everything but the endpoint and credentials
    pub fn new(
        uri: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            username: username.into(),
            password: password.into(),
            auth_method: AuthMethod::default(),
            jql: None,
            expand: Vec::new(),
            retry_limit: default_retry_limit(),
            initial_retry_interval_millis: default_initial_retry_interval(),
            maximum_retry_interval_millis: default_maximum_retry_interval(),
            page_size: default_page_size(),
            timeout_millis: default_timeout(),
            max_requests_per_second: None,
            dynamic_schema: false,
            columns: Vec::new(),
            default_timezone: default_timezone(),
            default_timestamp_format: default_timestamp_format(),
        }
    }

    /// Load and parse a YAML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a YAML config document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reject settings that would fail or misbehave at run time
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::config("Username or email could not be empty"));
        }
        if self.password.trim().is_empty() {
            return Err(Error::config("Password could not be empty"));
        }
        if self.uri.trim().is_empty() {
            return Err(Error::config("JIRA API endpoint could not be empty"));
        }
        if !is_valid_endpoint(&self.uri) {
            return Err(Error::config(
                "JIRA API endpoint is incorrect or not available",
            ));
        }
        if self.initial_retry_interval_millis < 1 {
            return Err(Error::config(
                "Initial retry delay should be equal or greater than 1",
            ));
        }
        if !(0..=10).contains(&self.retry_limit) {
            return Err(Error::config("Retry limit should between 0 and 10"));
        }
        if self.maximum_retry_interval_millis < self.initial_retry_interval_millis {
            return Err(Error::config(
                "Maximum retry delay should be equal or greater than initial retry delay",
            ));
        }
        if self.page_size < 1 {
            return Err(Error::config(
                "Page size should be equal or greater than 1",
            ));
        }
        parse_timezone(&self.default_timezone)?;
        for timezone in self.columns.iter().filter_map(|c| c.timezone.as_deref()) {
            parse_timezone(timezone)?;
        }
        if !self.dynamic_schema {
            if self.columns.is_empty() {
                return Err(Error::config(
                    "Columns could not be empty unless dynamic_schema is enabled",
                ));
            }
            Schema::new(self.columns.clone())?;
        }
        Ok(())
    }

    /// JQL to send, blank filters collapse to an empty string
    pub fn jql(&self) -> String {
        self.jql.clone().none_if_blank().unwrap_or_default()
    }

    /// Page size as requested from the API
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, i64::from(u32::MAX)) as u32
    }

    /// Retry policy built from the retry settings
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retry_limit: self.retry_limit.clamp(0, 10) as u32,
            initial_wait: Duration::from_millis(self.initial_retry_interval_millis.max(1) as u64),
            max_wait: Duration::from_millis(self.maximum_retry_interval_millis.max(1) as u64),
            backoff: BackoffType::Exponential,
        }
    }

    /// HTTP timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    /// Static schema with timestamp defaults filled in
    pub fn static_schema(&self) -> Result<Schema> {
        let columns = self
            .columns
            .iter()
            .cloned()
            .map(|column| self.with_timestamp_defaults(column))
            .collect();
        Schema::new(columns)
    }

    /// Fill in the default pattern and timezone on timestamp columns
    pub fn with_timestamp_defaults(&self, mut column: Column) -> Column {
        if column.column_type == crate::schema::ColumnType::Timestamp {
            column
                .format
                .get_or_insert_with(|| self.default_timestamp_format.clone());
            column
                .timezone
                .get_or_insert_with(|| self.default_timezone.clone());
        }
        column
    }
}

/// Endpoint must be an absolute http(s) URL with a host and no whitespace
fn is_valid_endpoint(uri: &str) -> bool {
    if uri.chars().any(char::is_whitespace) {
        return false;
    }
    match url::Url::parse(uri) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
