//! Arrow RecordBatch output
//!
//! Rows are appended to typed column builders and cut into batches of a
//! fixed size.

use super::RecordWriter;
use crate::error::{Error, Result};
use crate::schema::{Column, ColumnType, Schema};
use crate::types::JsonValue;
use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder,
    TimestampMillisecondBuilder,
};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Rows per batch unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Arrow schema for an output schema; every field is nullable
pub fn arrow_schema(schema: &Schema) -> ArrowSchema {
    let fields: Vec<Field> = schema
        .columns()
        .iter()
        .map(|column| Field::new(&column.name, arrow_type(column.column_type), true))
        .collect();
    ArrowSchema::new(fields)
}

fn arrow_type(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Boolean => DataType::Boolean,
        ColumnType::Long => DataType::Int64,
        ColumnType::Double => DataType::Float64,
        ColumnType::String | ColumnType::Json => DataType::Utf8,
        ColumnType::Timestamp => DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
    }
}

enum ColumnBuilder {
    Boolean(BooleanBuilder),
    Long(Int64Builder),
    Double(Float64Builder),
    Utf8(StringBuilder),
    Timestamp(TimestampMillisecondBuilder),
}

impl ColumnBuilder {
    fn new(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Boolean => ColumnBuilder::Boolean(BooleanBuilder::new()),
            ColumnType::Long => ColumnBuilder::Long(Int64Builder::new()),
            ColumnType::Double => ColumnBuilder::Double(Float64Builder::new()),
            ColumnType::String | ColumnType::Json => ColumnBuilder::Utf8(StringBuilder::new()),
            ColumnType::Timestamp => ColumnBuilder::Timestamp(
                TimestampMillisecondBuilder::new().with_timezone("UTC"),
            ),
        }
    }

    fn append_null(&mut self) {
        match self {
            ColumnBuilder::Boolean(b) => b.append_null(),
            ColumnBuilder::Long(b) => b.append_null(),
            ColumnBuilder::Double(b) => b.append_null(),
            ColumnBuilder::Utf8(b) => b.append_null(),
            ColumnBuilder::Timestamp(b) => b.append_null(),
        }
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            ColumnBuilder::Boolean(b) => Arc::new(b.finish()),
            ColumnBuilder::Long(b) => Arc::new(b.finish()),
            ColumnBuilder::Double(b) => Arc::new(b.finish()),
            ColumnBuilder::Utf8(b) => Arc::new(b.finish()),
            ColumnBuilder::Timestamp(b) => Arc::new(b.finish()),
        }
    }
}

/// Collects records into Arrow `RecordBatch`es
pub struct ArrowRecordWriter {
    schema: SchemaRef,
    builders: Vec<ColumnBuilder>,
    /// Columns already set in the current row
    filled: Vec<bool>,
    rows_in_batch: usize,
    batch_size: usize,
    batches: Vec<RecordBatch>,
    finished: bool,
}

impl std::fmt::Debug for ArrowRecordWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrowRecordWriter")
            .field("columns", &self.builders.len())
            .field("rows_in_batch", &self.rows_in_batch)
            .field("batches", &self.batches.len())
            .finish()
    }
}

impl ArrowRecordWriter {
    /// Create a writer for `schema` with the default batch size
    pub fn new(schema: &Schema) -> Self {
        Self::with_batch_size(schema, DEFAULT_BATCH_SIZE)
    }

    /// Create a writer cutting a batch every `batch_size` rows
    pub fn with_batch_size(schema: &Schema, batch_size: usize) -> Self {
        Self {
            schema: Arc::new(arrow_schema(schema)),
            builders: schema
                .columns()
                .iter()
                .map(|c| ColumnBuilder::new(c.column_type))
                .collect(),
            filled: vec![false; schema.len()],
            rows_in_batch: 0,
            batch_size: batch_size.max(1),
            batches: Vec::new(),
            finished: false,
        }
    }

    /// Arrow schema of the produced batches
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Take the batches completed so far
    pub fn take_batches(&mut self) -> Vec<RecordBatch> {
        std::mem::take(&mut self.batches)
    }

    /// Check if `finish` has been called
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Total rows across the completed batches
    pub fn completed_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    fn builder(&mut self, column: &Column) -> Option<&mut ColumnBuilder> {
        let filled = self.filled.get_mut(column.index)?;
        if *filled {
            return None;
        }
        *filled = true;
        self.builders.get_mut(column.index)
    }

    fn cut_batch(&mut self) -> Result<()> {
        if self.rows_in_batch == 0 {
            return Ok(());
        }
        let arrays: Vec<ArrayRef> = self.builders.iter_mut().map(ColumnBuilder::finish).collect();
        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        self.batches.push(batch);
        self.rows_in_batch = 0;
        Ok(())
    }
}

impl RecordWriter for ArrowRecordWriter {
    fn set_boolean(&mut self, column: &Column, value: bool) {
        match self.builder(column) {
            Some(ColumnBuilder::Boolean(b)) => b.append_value(value),
            Some(other) => other.append_null(),
            None => {}
        }
    }

    fn set_long(&mut self, column: &Column, value: i64) {
        match self.builder(column) {
            Some(ColumnBuilder::Long(b)) => b.append_value(value),
            Some(other) => other.append_null(),
            None => {}
        }
    }

    fn set_double(&mut self, column: &Column, value: f64) {
        match self.builder(column) {
            Some(ColumnBuilder::Double(b)) => b.append_value(value),
            Some(other) => other.append_null(),
            None => {}
        }
    }

    fn set_string(&mut self, column: &Column, value: String) {
        match self.builder(column) {
            Some(ColumnBuilder::Utf8(b)) => b.append_value(value),
            Some(other) => other.append_null(),
            None => {}
        }
    }

    fn set_timestamp(&mut self, column: &Column, value: DateTime<Utc>) {
        match self.builder(column) {
            Some(ColumnBuilder::Timestamp(b)) => b.append_value(value.timestamp_millis()),
            Some(other) => other.append_null(),
            None => {}
        }
    }

    fn set_json(&mut self, column: &Column, value: JsonValue) {
        match self.builder(column) {
            Some(ColumnBuilder::Utf8(b)) => b.append_value(value.to_string()),
            Some(other) => other.append_null(),
            None => {}
        }
    }

    fn set_null(&mut self, column: &Column) {
        if let Some(builder) = self.builder(column) {
            builder.append_null();
        }
    }

    fn add_record(&mut self) -> Result<()> {
        if self.finished {
            return Err(Error::output("Record added after finish"));
        }
        for (builder, filled) in self.builders.iter_mut().zip(self.filled.iter_mut()) {
            if !*filled {
                builder.append_null();
            }
            *filled = false;
        }
        self.rows_in_batch += 1;
        if self.rows_in_batch >= self.batch_size {
            self.cut_batch()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.cut_batch()?;
        self.finished = true;
        Ok(())
    }
}
