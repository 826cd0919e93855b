//! Output module
//!
//! The record-writer capability the converter writes into, plus the sinks
//! shipped with the extractor.
//!
//! # Overview
//!
//! - [`RecordWriter`]: per-column setters, `add_record` per row, `finish` once
//! - [`JsonLinesWriter`]: one JSON object per line
//! - [`ArrowRecordWriter`]: typed Arrow `RecordBatch`es
//! - [`ParquetRecordWriter`]: Arrow batches flushed to a Parquet file

mod batch;
mod jsonl;
mod writer;

pub use batch::{arrow_schema, ArrowRecordWriter, DEFAULT_BATCH_SIZE};
pub use jsonl::JsonLinesWriter;
pub use writer::{ParquetRecordWriter, ParquetWriter, ParquetWriterConfig};

use crate::error::Result;
use crate::schema::Column;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};

/// Sink for typed records
///
/// The converter calls exactly one setter per column of a row, then
/// `add_record`. `finish` is called once after the last row.
pub trait RecordWriter: Send {
    fn set_boolean(&mut self, column: &Column, value: bool);

    fn set_long(&mut self, column: &Column, value: i64);

    fn set_double(&mut self, column: &Column, value: f64);

    fn set_string(&mut self, column: &Column, value: String);

    fn set_timestamp(&mut self, column: &Column, value: DateTime<Utc>);

    fn set_json(&mut self, column: &Column, value: JsonValue);

    fn set_null(&mut self, column: &Column);

    /// Close the current row
    fn add_record(&mut self) -> Result<()>;

    /// Flush everything; no rows follow
    fn finish(&mut self) -> Result<()>;
}
