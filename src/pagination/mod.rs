//! Pagination module
//!
//! Supports: Offset (`startAt` + `total`) and Token (`nextPageToken`)
//!
//! # Overview
//!
//! JIRA exposes two mutually exclusive paging protocols. Which one is in
//! play is decided by the shape of each search response, never by the
//! client: a `total` field means offset paging, its absence means token
//! paging. `Cursor` carries the position for the next request.

mod types;

pub use types::{next_cursor, pages_needed, Cursor, PaginationMode};
