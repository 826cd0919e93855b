//! Issue to record conversion

use super::timestamp::TimestampParser;
use crate::client::Issue;
use crate::error::Result;
use crate::output::RecordWriter;
use crate::schema::{Column, ColumnType, Schema};
use crate::types::{JsonObject, JsonValue};
use tracing::trace;

/// String form of a JSON value, `None` for null
///
/// Arrays become their elements joined with `,`; string elements are taken
/// as-is and everything else in its JSON form, so `[1,{},[]]` becomes
/// `1,{},[]`.
pub fn stringify(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// Integral value of a JSON number
fn as_long(value: &JsonValue) -> Option<i64> {
    let JsonValue::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    let f = number.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Writes issues into a record writer according to a fixed schema
#[derive(Debug, Clone)]
pub struct RecordConverter {
    schema: Schema,
    /// One parser per column, only for timestamp columns
    parsers: Vec<Option<TimestampParser>>,
}

impl RecordConverter {
    /// Create a converter, building a timestamp parser for each timestamp column
    pub fn new(schema: Schema) -> Result<Self> {
        let parsers = schema
            .columns()
            .iter()
            .map(|column| match column.column_type {
                ColumnType::Timestamp => TimestampParser::new(
                    column.format.as_deref(),
                    column.timezone.as_deref(),
                )
                .map(Some),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { schema, parsers })
    }

    /// Schema records are shaped to
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Convert one issue and close the record
    pub fn add_record(&self, issue: &Issue, writer: &mut dyn RecordWriter) -> Result<()> {
        for column in self.schema.columns() {
            self.convert_column(column, issue.get(&column.name), writer);
        }
        writer.add_record()
    }

    fn convert_column(
        &self,
        column: &Column,
        value: Option<&JsonValue>,
        writer: &mut dyn RecordWriter,
    ) {
        let value = value.filter(|v| !v.is_null());

        if column.column_type == ColumnType::Json {
            let json = value
                .cloned()
                .unwrap_or_else(|| JsonValue::Object(JsonObject::new()));
            writer.set_json(column, json);
            return;
        }

        let Some(value) = value else {
            writer.set_null(column);
            return;
        };

        match column.column_type {
            ColumnType::Boolean => match value.as_bool() {
                Some(b) => writer.set_boolean(column, b),
                None => writer.set_null(column),
            },
            ColumnType::Long => match as_long(value) {
                Some(n) => writer.set_long(column, n),
                None => writer.set_null(column),
            },
            ColumnType::Double => match value.as_f64() {
                Some(f) => writer.set_double(column, f),
                None => writer.set_null(column),
            },
            ColumnType::String => match stringify(value) {
                Some(s) => writer.set_string(column, s),
                None => writer.set_null(column),
            },
            ColumnType::Timestamp => {
                let parsed = self
                    .parsers
                    .get(column.index)
                    .and_then(Option::as_ref)
                    .zip(value.as_str())
                    .and_then(|(parser, s)| parser.parse(s));
                match parsed {
                    Some(ts) => writer.set_timestamp(column, ts),
                    None => {
                        trace!("Column '{}' could not parse timestamp {value}", column.name);
                        writer.set_null(column);
                    }
                }
            }
            ColumnType::Json => {}
        }
    }
}
