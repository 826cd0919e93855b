//! Tests for the record converter

use super::*;
use crate::client::Issue;
use crate::error::Result;
use crate::output::RecordWriter;
use crate::schema::{Column, ColumnType, Schema, DEFAULT_TIMESTAMP_FORMAT};
use crate::types::JsonValue;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use test_case::test_case;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Boolean(String, bool),
    Long(String, i64),
    Double(String, f64),
    String(String, String),
    Timestamp(String, DateTime<Utc>),
    Json(String, JsonValue),
    Null(String),
    AddRecord,
}

#[derive(Default)]
struct RecordingWriter {
    calls: Vec<Call>,
}

impl RecordWriter for RecordingWriter {
    fn set_boolean(&mut self, column: &Column, value: bool) {
        self.calls.push(Call::Boolean(column.name.clone(), value));
    }

    fn set_long(&mut self, column: &Column, value: i64) {
        self.calls.push(Call::Long(column.name.clone(), value));
    }

    fn set_double(&mut self, column: &Column, value: f64) {
        self.calls.push(Call::Double(column.name.clone(), value));
    }

    fn set_string(&mut self, column: &Column, value: String) {
        self.calls.push(Call::String(column.name.clone(), value));
    }

    fn set_timestamp(&mut self, column: &Column, value: DateTime<Utc>) {
        self.calls.push(Call::Timestamp(column.name.clone(), value));
    }

    fn set_json(&mut self, column: &Column, value: JsonValue) {
        self.calls.push(Call::Json(column.name.clone(), value));
    }

    fn set_null(&mut self, column: &Column) {
        self.calls.push(Call::Null(column.name.clone()));
    }

    fn add_record(&mut self) -> Result<()> {
        self.calls.push(Call::AddRecord);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

fn convert_one(column: Column, issue: JsonValue) -> Call {
    let converter = RecordConverter::new(Schema::new(vec![column]).unwrap()).unwrap();
    let issue = Issue::from_json(issue).unwrap();
    let mut writer = RecordingWriter::default();
    converter.add_record(&issue, &mut writer).unwrap();

    assert_eq!(writer.calls.len(), 2);
    assert_eq!(writer.calls[1], Call::AddRecord);
    writer.calls.remove(0)
}

fn full_schema() -> Schema {
    Schema::new(vec![
        Column::new("boolean", ColumnType::Boolean),
        Column::new("long", ColumnType::Long),
        Column::new("double", ColumnType::Double),
        Column::new("string", ColumnType::String),
        Column::timestamp("date", DEFAULT_TIMESTAMP_FORMAT).with_timezone("UTC"),
        Column::new("json", ColumnType::Json),
    ])
    .unwrap()
}

fn jan_first() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap()
}

// ============================================================================
// stringify Tests
// ============================================================================

#[test_case(json!(null) => None ; "null")]
#[test_case(json!("text") => Some("text".to_string()) ; "string is raw")]
#[test_case(json!(1) => Some("1".to_string()) ; "number")]
#[test_case(json!(true) => Some("true".to_string()) ; "boolean")]
#[test_case(json!([1, {}, []]) => Some("1,{},[]".to_string()) ; "array of mixed")]
#[test_case(json!(["a", "b"]) => Some("a,b".to_string()) ; "array of strings")]
#[test_case(json!({}) => Some("{}".to_string()) ; "empty object")]
#[test_case(json!({"a": 1}) => Some(r#"{"a":1}"#.to_string()) ; "object")]
fn test_stringify(value: JsonValue) -> Option<String> {
    stringify(&value)
}

// ============================================================================
// Conversion Table Tests
// ============================================================================

#[test_case(json!(true) => Call::Boolean("c".into(), true) ; "boolean present")]
#[test_case(json!("true") => Call::Null("c".into()) ; "boolean mismatched")]
#[test_case(json!(1) => Call::Null("c".into()) ; "boolean from number")]
#[test_case(json!(null) => Call::Null("c".into()) ; "boolean null")]
fn test_boolean_column(value: JsonValue) -> Call {
    convert_one(Column::new("c", ColumnType::Boolean), json!({"c": value}))
}

#[test_case(json!(42) => Call::Long("c".into(), 42) ; "long present")]
#[test_case(json!(-3) => Call::Long("c".into(), -3) ; "long negative")]
#[test_case(json!(2.0) => Call::Long("c".into(), 2) ; "long from integral float")]
#[test_case(json!(2.5) => Call::Null("c".into()) ; "long from fraction")]
#[test_case(json!("42") => Call::Null("c".into()) ; "long mismatched")]
#[test_case(json!({}) => Call::Null("c".into()) ; "long from object")]
#[test_case(json!(null) => Call::Null("c".into()) ; "long null")]
fn test_long_column(value: JsonValue) -> Call {
    convert_one(Column::new("c", ColumnType::Long), json!({"c": value}))
}

#[test_case(json!(1.5) => Call::Double("c".into(), 1.5) ; "double present")]
#[test_case(json!(1) => Call::Double("c".into(), 1.0) ; "double from integer")]
#[test_case(json!("1.5") => Call::Null("c".into()) ; "double mismatched")]
#[test_case(json!(null) => Call::Null("c".into()) ; "double null")]
fn test_double_column(value: JsonValue) -> Call {
    convert_one(Column::new("c", ColumnType::Double), json!({"c": value}))
}

#[test_case(json!("PRJ-1") => Call::String("c".into(), "PRJ-1".into()) ; "string present")]
#[test_case(json!(12) => Call::String("c".into(), "12".into()) ; "string from number")]
#[test_case(json!([1, {}, []]) => Call::String("c".into(), "1,{},[]".into()) ; "string from array")]
#[test_case(json!({}) => Call::String("c".into(), "{}".into()) ; "string from object")]
#[test_case(json!(null) => Call::Null("c".into()) ; "string null")]
fn test_string_column(value: JsonValue) -> Call {
    convert_one(Column::new("c", ColumnType::String), json!({"c": value}))
}

#[test_case(json!("2019-01-01T00:00:00.000Z") => Call::Timestamp("c".into(), jan_first()) ; "timestamp zulu")]
#[test_case(json!("2019-01-01T09:00:00.000+0900") => Call::Timestamp("c".into(), jan_first()) ; "timestamp offset")]
#[test_case(json!("yesterday") => Call::Null("c".into()) ; "timestamp unparseable")]
#[test_case(json!(1_546_300_800_000_i64) => Call::Null("c".into()) ; "timestamp from number")]
#[test_case(json!(null) => Call::Null("c".into()) ; "timestamp null")]
fn test_timestamp_column(value: JsonValue) -> Call {
    convert_one(
        Column::timestamp("c", DEFAULT_TIMESTAMP_FORMAT),
        json!({"c": value}),
    )
}

#[test_case(json!({"name": "Done"}) => Call::Json("c".into(), json!({"name": "Done"})) ; "json object")]
#[test_case(json!([1, 2]) => Call::Json("c".into(), json!([1, 2])) ; "json array")]
#[test_case(json!("text") => Call::Json("c".into(), json!("text")) ; "json scalar")]
#[test_case(json!(null) => Call::Json("c".into(), json!({})) ; "json null")]
fn test_json_column(value: JsonValue) -> Call {
    convert_one(Column::new("c", ColumnType::Json), json!({"c": value}))
}

#[test]
fn test_json_column_absent_is_empty_object() {
    assert_eq!(
        convert_one(Column::new("c", ColumnType::Json), json!({"other": 1})),
        Call::Json("c".into(), json!({}))
    );
}

// ============================================================================
// Whole Record Tests
// ============================================================================

#[test]
fn test_add_record_all_right() {
    let issue = Issue::from_json(json!({
        "id": "10000",
        "fields": {
            "boolean": true,
            "long": 1,
            "double": 1,
            "string": "string",
            "date": "2019-01-01T00:00:00.000Z",
            "json": {}
        }
    }))
    .unwrap();

    let converter = RecordConverter::new(full_schema()).unwrap();
    let mut writer = RecordingWriter::default();
    converter.add_record(&issue, &mut writer).unwrap();

    assert_eq!(
        writer.calls,
        vec![
            Call::Boolean("boolean".into(), true),
            Call::Long("long".into(), 1),
            Call::Double("double".into(), 1.0),
            Call::String("string".into(), "string".into()),
            Call::Timestamp("date".into(), jan_first()),
            Call::Json("json".into(), json!({})),
            Call::AddRecord,
        ]
    );
}

#[test]
fn test_add_record_all_wrong() {
    let issue = Issue::from_json(json!({
        "fields": {
            "boolean": {},
            "long": {},
            "double": {},
            "string": {},
            "date": {},
            "json": {}
        }
    }))
    .unwrap();

    let converter = RecordConverter::new(full_schema()).unwrap();
    let mut writer = RecordingWriter::default();
    converter.add_record(&issue, &mut writer).unwrap();

    assert_eq!(
        writer.calls,
        vec![
            Call::Null("boolean".into()),
            Call::Null("long".into()),
            Call::Null("double".into()),
            Call::String("string".into(), "{}".into()),
            Call::Null("date".into()),
            Call::Json("json".into(), json!({})),
            Call::AddRecord,
        ]
    );
}

#[test]
fn test_add_record_all_missing() {
    let issue = Issue::from_json(json!({"fields": {}})).unwrap();

    let converter = RecordConverter::new(full_schema()).unwrap();
    let mut writer = RecordingWriter::default();
    converter.add_record(&issue, &mut writer).unwrap();

    assert_eq!(
        writer.calls,
        vec![
            Call::Null("boolean".into()),
            Call::Null("long".into()),
            Call::Null("double".into()),
            Call::Null("string".into()),
            Call::Null("date".into()),
            Call::Json("json".into(), json!({})),
            Call::AddRecord,
        ]
    );
}

#[test]
fn test_add_record_dotted_column() {
    let issue = json!({"fields": {"status": {"name": "In Progress"}}});
    assert_eq!(
        convert_one(Column::new("status.name", ColumnType::String), issue),
        Call::String("status.name".into(), "In Progress".into())
    );
}

#[test]
fn test_unknown_timezone_rejected() {
    let schema = Schema::new(vec![
        Column::timestamp("created", DEFAULT_TIMESTAMP_FORMAT).with_timezone("Mars/Olympus"),
    ])
    .unwrap();
    let err = RecordConverter::new(schema).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Configuration error: Unknown timezone 'Mars/Olympus'"
    );
}

// ============================================================================
// Timestamp Parser Tests
// ============================================================================

#[test]
fn test_translate_pattern() {
    assert_eq!(
        translate_pattern("%Y-%m-%dT%H:%M:%S.%L%z"),
        "%Y-%m-%dT%H:%M:%S%.3f%z"
    );
    assert_eq!(translate_pattern("%H:%M:%S.%N"), "%H:%M:%S%.f");
    assert_eq!(translate_pattern("%s%L"), "%s%3f");
    assert_eq!(translate_pattern("%Y-%m-%d"), "%Y-%m-%d");
}

#[test]
fn test_parser_uses_timezone_for_naive_values() {
    let parser = TimestampParser::new(Some("%Y-%m-%d %H:%M:%S"), Some("Asia/Tokyo")).unwrap();
    assert_eq!(
        parser.parse("2019-01-01 09:00:00"),
        Some(jan_first())
    );
}

#[test]
fn test_parser_date_only() {
    let parser = TimestampParser::new(Some("%Y-%m-%d"), None).unwrap();
    assert_eq!(parser.parse("2019-01-01"), Some(jan_first()));
    assert_eq!(parser.parse("01/01/2019"), None);
}

#[test]
fn test_parser_default_pattern() {
    let parser = TimestampParser::default();
    assert_eq!(parser.pattern(), "%Y-%m-%dT%H:%M:%S%.3f%z");
    assert_eq!(
        parser.parse("2019-01-01T00:00:00.000+0000"),
        Some(jan_first())
    );
}
