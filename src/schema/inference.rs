//! Column type inference from sample issues

use super::types::{Column, ColumnType, Schema};
use crate::client::Issue;
use crate::convert::TimestampParser;
use crate::error::Result;
use crate::types::JsonValue;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// ISO-8601-like date-time prefix: `2024-01-31T12:00:00` or `2024-01-31 12:00:00`
static TIMESTAMP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}").unwrap());

/// Check if a string looks like a date-time
pub fn looks_like_timestamp(s: &str) -> bool {
    TIMESTAMP_REGEX.is_match(s)
}

/// Best-fit column type for a single value, `None` for null
///
/// Precedence: boolean, integral number, floating number, timestamp-like
/// string, JSON structure, string.
pub fn guess_column_type(value: &JsonValue) -> Option<ColumnType> {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(_) => Some(ColumnType::Boolean),
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => Some(ColumnType::Long),
        JsonValue::Number(_) => Some(ColumnType::Double),
        JsonValue::String(s) if looks_like_timestamp(s) => Some(ColumnType::Timestamp),
        JsonValue::String(_) => Some(ColumnType::String),
        JsonValue::Object(_) | JsonValue::Array(_) => Some(ColumnType::Json),
    }
}

/// Infer one column per distinct key across `issues`, in first-seen order
///
/// Types observed for the same key are merged; a key that only ever holds
/// `null` becomes a string column. Timestamp columns get the given pattern
/// and timezone, so a timestamp-like value the pattern cannot parse counts
/// as a string.
pub fn guess_schema(issues: &[Issue], timestamp_format: &str, timezone: &str) -> Result<Schema> {
    let parser = TimestampParser::new(Some(timestamp_format), Some(timezone))?;
    let mut observed: Vec<(String, Option<ColumnType>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for issue in issues {
        for (key, value) in issue.values() {
            let column_type = match (guess_column_type(value), value) {
                (Some(ColumnType::Timestamp), JsonValue::String(s)) if parser.parse(s).is_none() => {
                    Some(ColumnType::String)
                }
                (t, _) => t,
            };
            match positions.get(key) {
                Some(&i) => {
                    let current = &mut observed[i].1;
                    *current = match (*current, column_type) {
                        (None, t) | (t, None) => t,
                        (Some(a), Some(b)) => Some(a.merge_with(b)),
                    };
                }
                None => {
                    positions.insert(key.clone(), observed.len());
                    observed.push((key.clone(), column_type));
                }
            }
        }
    }

    let columns = observed
        .into_iter()
        .map(|(name, column_type)| match column_type.unwrap_or(ColumnType::String) {
            ColumnType::Timestamp => {
                Column::timestamp(name, timestamp_format).with_timezone(timezone)
            }
            other => Column::new(name, other),
        })
        .collect();

    Schema::new(columns)
}
