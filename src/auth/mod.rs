//! Authentication module
//!
//! Supports: Basic (default) and Bearer.
//!
//! Every request to JIRA carries an `Authorization` header built from the
//! configured credentials; there is no token exchange or caching.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// How credentials are attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// `Basic base64(username:password)`
    #[default]
    Basic,
    /// `Bearer <password>`, for personal access tokens
    Bearer,
}

/// Credentials for one JIRA endpoint
#[derive(Clone)]
pub struct Credentials {
    /// Header scheme
    pub method: AuthMethod,
    /// Username or email
    pub username: String,
    /// Password, API token or personal access token
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(method: AuthMethod, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            method,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value of the `Authorization` header
    pub fn authorization_header(&self) -> String {
        match self.method {
            AuthMethod::Basic => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", self.username, self.password));
                format!("Basic {encoded}")
            }
            AuthMethod::Bearer => format!("Bearer {}", self.password),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("method", &self.method)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
