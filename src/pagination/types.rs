//! Pagination types
//!
//! Cursor representation and the arithmetic that decides whether another
//! page follows a search response.

use serde_json::{Map, Value};

/// Position of the next page request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    /// First request; sends no position at all
    #[default]
    Start,
    /// Legacy offset paging (`startAt`)
    Offset(u64),
    /// Token paging (`nextPageToken`)
    Token(String),
}

impl Cursor {
    /// Offset of the first issue this cursor asks for, when known
    pub fn start_at(&self) -> Option<u64> {
        match self {
            Cursor::Start => Some(0),
            Cursor::Offset(offset) => Some(*offset),
            Cursor::Token(_) => None,
        }
    }

    /// Write the cursor into a search request body
    pub fn apply(&self, body: &mut Map<String, Value>) {
        match self {
            Cursor::Start => {}
            Cursor::Offset(offset) => {
                body.insert("startAt".to_string(), Value::from(*offset));
            }
            Cursor::Token(token) => {
                body.insert("nextPageToken".to_string(), Value::from(token.as_str()));
            }
        }
    }
}

/// Paging protocol, detected from a search response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Response carries `total`
    Offset {
        /// Total number of matching issues
        total: u64,
    },
    /// Response carries no `total`
    Token,
}

impl PaginationMode {
    /// Detect the protocol from a search response
    pub fn detect(response: &Value) -> Self {
        match response.get("total").and_then(Value::as_u64) {
            Some(total) => PaginationMode::Offset { total },
            None => PaginationMode::Token,
        }
    }

    /// Total count, only known in offset mode
    pub fn total(&self) -> Option<u64> {
        match self {
            PaginationMode::Offset { total } => Some(*total),
            PaginationMode::Token => None,
        }
    }
}

/// Number of pages needed for `total` issues at `page_size` per page
pub fn pages_needed(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

/// Cursor for the page after `response`, or `None` when paging is finished
///
/// `requested` is the cursor that produced `response` and `issue_count` the
/// number of issues it returned. An empty page always finishes paging.
pub fn next_cursor(
    response: &Value,
    requested: &Cursor,
    page_size: u32,
    issue_count: usize,
) -> Option<Cursor> {
    if issue_count == 0 {
        return None;
    }

    match PaginationMode::detect(response) {
        PaginationMode::Offset { total } => {
            let next = requested.start_at().unwrap_or(0) + u64::from(page_size);
            (next < total).then_some(Cursor::Offset(next))
        }
        PaginationMode::Token => response
            .get("nextPageToken")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(|token| Cursor::Token(token.to_string())),
    }
}
