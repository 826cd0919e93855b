//! Error types for the JIRA extractor
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// Status code reported for failures that never produced an HTTP response
pub const TRANSPORT_STATUS: i32 = -1;

/// The main error type for the JIRA extractor
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("{message}")]
    Credential { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("JIRA API returned status {status}: {message}")]
    Api { status: i32, message: String },

    #[error("HTTP transport failed: {message}")]
    Transport { message: String },

    #[error("Retry limit exceeded after {retries} retries: {source}")]
    RetryExhausted {
        retries: u32,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a credential error
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    /// Create an API status error
    pub fn api(status: i32, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// HTTP status attached to this error, `-1` for transport failures
    pub fn status_code(&self) -> Option<i32> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Transport { .. } => Some(TRANSPORT_STATUS),
            Error::RetryExhausted { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// The bare detail message, without the variant prefix
    pub fn detail(&self) -> String {
        match self {
            Error::Config { message }
            | Error::Credential { message }
            | Error::Api { message, .. }
            | Error::Transport { message }
            | Error::Output { message } => message.clone(),
            Error::RetryExhausted { source, .. } => source.detail(),
            other => other.to_string(),
        }
    }

    /// Check if this error is retryable
    ///
    /// JIRA answers 401 under heavy load even for valid credentials, so 401
    /// and 429 are retried along with every non-4xx status.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } => true,
            Error::Api { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: i32) -> bool {
    status / 100 != 4 || status == 401 || status == 429
}

/// Result type alias for the JIRA extractor
pub type Result<T> = std::result::Result<T, Error>;
