//! Output schema module
//!
//! Column definitions plus the two ways of arriving at them:
//!
//! - **Static**: columns come from configuration
//! - **Guess**: columns are inferred from a sample page of issues
//!
//! The schema is resolved once per run and never changes afterwards.

mod inference;
mod resolver;
mod types;

pub use inference::{guess_column_type, guess_schema, looks_like_timestamp};
pub use resolver::{SchemaResolver, GUESS_SAMPLE_SIZE};
pub use types::{Column, ColumnType, Schema, DEFAULT_TIMESTAMP_FORMAT, DEFAULT_TIMEZONE};
