//! Parquet file writer
//!
//! Streams Arrow batches produced by [`ArrowRecordWriter`] into a Parquet file.

use super::batch::ArrowRecordWriter;
use super::RecordWriter;
use crate::error::{Error, Result};
use crate::schema::{Column, Schema};
use crate::types::JsonValue;
use arrow::datatypes::Schema as ArrowSchema;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    batch_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            batch_size: super::DEFAULT_BATCH_SIZE,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Set rows buffered before a batch is written
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Use ZSTD compression
    #[must_use]
    pub fn zstd(mut self) -> Self {
        self.compression = Compression::ZSTD(parquet::basic::ZstdLevel::default());
        self
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Parquet file writer
pub struct ParquetWriter {
    /// Arrow writer
    writer: ArrowWriter<File>,
    /// Number of rows written
    rows_written: usize,
}

impl ParquetWriter {
    /// Create a new Parquet writer
    pub fn new(
        path: impl AsRef<Path>,
        schema: &ArrowSchema,
        config: &ParquetWriterConfig,
    ) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|e| Error::Output {
            message: format!("Failed to create file: {e}"),
        })?;

        let props = config.build_properties();
        let writer =
            ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props)).map_err(|e| {
                Error::Output {
                    message: format!("Failed to create Parquet writer: {e}"),
                }
            })?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write a RecordBatch to the file
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch).map_err(|e| Error::Output {
            message: format!("Failed to write batch: {e}"),
        })?;

        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Close the writer and finalize the file
    pub fn close(self) -> Result<usize> {
        let rows = self.rows_written;
        self.writer.close().map_err(|e| Error::Output {
            message: format!("Failed to close Parquet writer: {e}"),
        })?;
        Ok(rows)
    }
}

/// Record writer producing a Parquet file
///
/// Completed batches are written as they fill up; the file is closed on
/// `finish`.
pub struct ParquetRecordWriter {
    batches: ArrowRecordWriter,
    file: Option<ParquetWriter>,
}

impl ParquetRecordWriter {
    /// Create the output file for `schema`
    pub fn create(
        path: impl AsRef<Path>,
        schema: &Schema,
        config: &ParquetWriterConfig,
    ) -> Result<Self> {
        let batches = ArrowRecordWriter::with_batch_size(schema, config.batch_size);
        let file = ParquetWriter::new(path.as_ref(), batches.schema().as_ref(), config)?;
        debug!(
            "Writing Parquet to '{}' (row groups of {} rows)",
            path.as_ref().display(),
            config.row_group_size()
        );
        Ok(Self {
            batches,
            file: Some(file),
        })
    }

    fn flush_batches(&mut self) -> Result<()> {
        let completed = self.batches.take_batches();
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::output("Parquet file already closed"))?;
        for batch in &completed {
            file.write(batch)?;
        }
        Ok(())
    }
}

impl RecordWriter for ParquetRecordWriter {
    fn set_boolean(&mut self, column: &Column, value: bool) {
        self.batches.set_boolean(column, value);
    }

    fn set_long(&mut self, column: &Column, value: i64) {
        self.batches.set_long(column, value);
    }

    fn set_double(&mut self, column: &Column, value: f64) {
        self.batches.set_double(column, value);
    }

    fn set_string(&mut self, column: &Column, value: String) {
        self.batches.set_string(column, value);
    }

    fn set_timestamp(&mut self, column: &Column, value: DateTime<Utc>) {
        self.batches.set_timestamp(column, value);
    }

    fn set_json(&mut self, column: &Column, value: JsonValue) {
        self.batches.set_json(column, value);
    }

    fn set_null(&mut self, column: &Column) {
        self.batches.set_null(column);
    }

    fn add_record(&mut self) -> Result<()> {
        self.batches.add_record()?;
        self.flush_batches()
    }

    fn finish(&mut self) -> Result<()> {
        self.batches.finish()?;
        self.flush_batches()?;
        if let Some(file) = self.file.take() {
            let rows = file.close()?;
            info!("Wrote {rows} rows to Parquet");
        }
        Ok(())
    }
}
