//! JSON Lines output

use super::RecordWriter;
use crate::error::{Error, Result};
use crate::schema::Column;
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;

/// Writes each record as one JSON object per line, keys in column order
///
/// Timestamps are rendered as RFC 3339 with millisecond precision.
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write + Send> {
    out: W,
    current: JsonObject,
    records_written: usize,
}

impl<W: Write + Send> JsonLinesWriter<W> {
    /// Create a writer over `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: JsonObject::new(),
            records_written: 0,
        }
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Return the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }

    fn set(&mut self, column: &Column, value: JsonValue) {
        self.current.insert(column.name.clone(), value);
    }
}

impl<W: Write + Send> RecordWriter for JsonLinesWriter<W> {
    fn set_boolean(&mut self, column: &Column, value: bool) {
        self.set(column, JsonValue::Bool(value));
    }

    fn set_long(&mut self, column: &Column, value: i64) {
        self.set(column, JsonValue::from(value));
    }

    fn set_double(&mut self, column: &Column, value: f64) {
        // NaN and infinities have no JSON form
        self.set(column, JsonValue::from(value));
    }

    fn set_string(&mut self, column: &Column, value: String) {
        self.set(column, JsonValue::String(value));
    }

    fn set_timestamp(&mut self, column: &Column, value: DateTime<Utc>) {
        self.set(
            column,
            JsonValue::String(value.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }

    fn set_json(&mut self, column: &Column, value: JsonValue) {
        self.set(column, value);
    }

    fn set_null(&mut self, column: &Column) {
        self.set(column, JsonValue::Null);
    }

    fn add_record(&mut self) -> Result<()> {
        let record = JsonValue::Object(std::mem::take(&mut self.current));
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.records_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.current.is_empty() {
            return Err(Error::output("Unfinished record at end of stream"));
        }
        self.out.flush()?;
        Ok(())
    }
}
