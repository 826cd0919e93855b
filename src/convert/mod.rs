//! Record conversion module
//!
//! Maps one issue's merged fields onto the output schema, column by column,
//! through the [`RecordWriter`](crate::output::RecordWriter) capability.
//!
//! Conversion is lenient: a value that does not fit its column becomes
//! `null` (or `{}` for JSON columns) instead of an error.

mod converter;
mod timestamp;

pub use converter::{stringify, RecordConverter};
pub use timestamp::{parse_timezone, translate_pattern, TimestampParser};

#[cfg(test)]
mod tests;
