// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # jira-extract
//!
//! Pulls issues out of the JIRA REST search API and turns them into a
//! typed record stream.
//!
//! ## Features
//!
//! - **Uniform Retries**: Exponential backoff for 5xx, 401, 429 and transport failures
//! - **Two Paging Protocols**: Offset (`startAt`/`total`) and token (`nextPageToken`)
//! - **Static or Guessed Schema**: Configured columns, or inferred from a sample page
//! - **Lenient Conversion**: Mismatched values degrade to null instead of failing
//! - **JSON Lines, Arrow and Parquet Output**
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jira_extract::{
//!     JiraConfig, JsonLinesWriter, RecordConverter, Result, SchemaResolver, SyncEngine,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = JiraConfig::load("config.yml")?;
//!
//!     let mut engine = SyncEngine::from_config(&config)?;
//!     engine.start().await?;
//!
//!     let schema = SchemaResolver::from_config(&config)?
//!         .resolve(engine.client())
//!         .await?;
//!     let converter = RecordConverter::new(schema)?;
//!
//!     let mut writer = JsonLinesWriter::new(std::io::stdout());
//!     let stats = engine.run(&converter, &mut writer).await?;
//!     println!("{} records", stats.records_synced);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    SyncEngine (driver)                       │
//! │   Start → Fetching → MorePages | Exhausted → Done            │
//! └──────────────────────────────────────────────────────────────┘
//!          │                         │                    │
//! ┌────────┴─────────┐   ┌───────────┴────────┐   ┌───────┴───────┐
//! │    JiraClient    │   │   SchemaResolver   │   │ RecordWriter  │
//! ├──────────────────┤   ├────────────────────┤   ├───────────────┤
//! │ Retry executor   │   │ Static columns     │   │ JSON Lines    │
//! │ HTTP transport   │   │ Guess from sample  │   │ Arrow         │
//! │ Cursor / paging  │   │ RecordConverter    │   │ Parquet       │
//! └──────────────────┘   └────────────────────┘   └───────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authorization header construction
pub mod auth;

/// Bounded retries with backoff
pub mod retry;

/// HTTP transport with rate limiting
pub mod http;

/// Cursor types and page arithmetic
pub mod pagination;

/// JIRA search client
pub mod client;

/// Output schema and schema guessing
pub mod schema;

/// Issue to record conversion
pub mod convert;

/// Record writers (JSON Lines, Arrow, Parquet)
pub mod output;

/// Pagination driver
pub mod engine;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{Issue, JiraClient, Page};
pub use config::JiraConfig;
pub use convert::RecordConverter;
pub use engine::{SyncConfig, SyncEngine, SyncStats};
pub use output::{
    ArrowRecordWriter, JsonLinesWriter, ParquetRecordWriter, RecordWriter,
};
pub use pagination::Cursor;
pub use schema::{Column, ColumnType, Schema, SchemaResolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
