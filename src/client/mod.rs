//! JIRA search client
//!
//! Credential check, total-count probe and paginated issue search on top of
//! the HTTP transport and the retry executor.

mod search;
mod types;

pub use search::{build_permission_url, build_search_url, JiraClient};
pub use types::{Issue, Page};
