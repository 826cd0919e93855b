//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → search pages → typed records

use chrono::{DateTime, Utc};
use jira_extract::output::ParquetWriterConfig;
use jira_extract::{
    Column, ColumnType, JiraConfig, JsonLinesWriter, JsonValue, ParquetRecordWriter,
    RecordConverter, RecordWriter, Result, SchemaResolver, SyncConfig, SyncEngine,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::json;
use std::fs::File;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH: &str = "/rest/api/latest/search/jql";
const MYSELF: &str = "/rest/api/latest/myself";

/// Counts records and finish signals
#[derive(Default)]
struct CountingWriter {
    records: usize,
    finishes: usize,
}

impl RecordWriter for CountingWriter {
    fn set_boolean(&mut self, _: &Column, _: bool) {}
    fn set_long(&mut self, _: &Column, _: i64) {}
    fn set_double(&mut self, _: &Column, _: f64) {}
    fn set_string(&mut self, _: &Column, _: String) {}
    fn set_timestamp(&mut self, _: &Column, _: DateTime<Utc>) {}
    fn set_json(&mut self, _: &Column, _: JsonValue) {}
    fn set_null(&mut self, _: &Column) {}

    fn add_record(&mut self) -> Result<()> {
        self.records += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finishes += 1;
        Ok(())
    }
}

fn config_yaml(uri: &str, page_size: u32) -> String {
    format!(
        r#"
uri: {uri}
username: user
password: pass
jql: project = PRJ
page_size: {page_size}
initial_retry_interval_millis: 1
maximum_retry_interval_millis: 2
columns:
  - {{ name: key, type: string }}
  - {{ name: votes, type: long }}
  - {{ name: created, type: timestamp }}
  - {{ name: status, type: json }}
"#
    )
}

async fn mount_credentials(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(MYSELF))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "user"})))
        .expect(1)
        .mount(server)
        .await;
}

async fn prepare(config: &JiraConfig, sync: SyncConfig) -> (SyncEngine, RecordConverter) {
    let mut engine = SyncEngine::from_config(config).unwrap().with_config(sync);
    engine.start().await.unwrap();
    let schema = SchemaResolver::from_config(config)
        .unwrap()
        .resolve(engine.client())
        .await
        .unwrap();
    (engine, RecordConverter::new(schema).unwrap())
}

// ============================================================================
// End-to-End Scenarios
// ============================================================================

#[tokio::test]
async fn test_empty_result_emits_nothing_and_finishes_once() {
    let server = MockServer::start().await;
    mount_credentials(&server).await;
    Mock::given(method("POST"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": 0, "maxResults": 50, "total": 0, "issues": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = JiraConfig::from_yaml_str(&config_yaml(&server.uri(), 50)).unwrap();
    let (mut engine, converter) = prepare(&config, SyncConfig::default()).await;

    let mut writer = CountingWriter::default();
    let stats = engine.run(&converter, &mut writer).await.unwrap();

    assert_eq!(writer.records, 0);
    assert_eq!(writer.finishes, 1);
    assert_eq!(stats.total, Some(0));
}

#[tokio::test]
async fn test_two_pages_in_order_as_json_lines() {
    let server = MockServer::start().await;
    mount_credentials(&server).await;

    Mock::given(method("POST"))
        .and(path(SEARCH))
        .and(body_partial_json(json!({"startAt": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": 1, "maxResults": 1, "total": 2,
            "issues": [{
                "id": "10002", "key": "PRJ-2",
                "fields": {"votes": 2.0, "created": "2019-01-02T00:00:00.000Z", "status": null}
            }]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEARCH))
        .and(body_partial_json(json!({
            "jql": "project = PRJ", "maxResults": 1, "fields": ["*all"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": 0, "maxResults": 1, "total": 2,
            "issues": [{
                "id": "10001", "key": "PRJ-1",
                "fields": {"votes": 5, "created": "2019-01-01T00:00:00.000+0000", "status": {"name": "Open"}}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = JiraConfig::from_yaml_str(&config_yaml(&server.uri(), 1)).unwrap();
    let (mut engine, converter) = prepare(&config, SyncConfig::default()).await;

    let mut writer = JsonLinesWriter::new(Vec::new());
    let stats = engine.run(&converter, &mut writer).await.unwrap();
    assert_eq!(stats.records_synced, 2);
    assert_eq!(stats.pages_fetched, 2);

    let out = String::from_utf8(writer.into_inner()).unwrap();
    let records: Vec<JsonValue> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(
        records,
        vec![
            json!({"key": "PRJ-1", "votes": 5, "created": "2019-01-01T00:00:00.000Z", "status": {"name": "Open"}}),
            json!({"key": "PRJ-2", "votes": 2, "created": "2019-01-02T00:00:00.000Z", "status": {}}),
        ]
    );
}

#[tokio::test]
async fn test_token_pagination_with_retry() {
    let server = MockServer::start().await;
    mount_credentials(&server).await;

    Mock::given(method("POST"))
        .and(path(SEARCH))
        .and(body_partial_json(json!({"nextPageToken": "next"})))
        .respond_with(ResponseTemplate::new(429))
        .with_priority(1)
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEARCH))
        .and(body_partial_json(json!({"nextPageToken": "next"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [{"key": "PRJ-3"}], "isLast": true
        })))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [{"key": "PRJ-1"}, {"key": "PRJ-2"}],
            "nextPageToken": "next"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = JiraConfig::from_yaml_str(&config_yaml(&server.uri(), 2)).unwrap();
    let (mut engine, converter) = prepare(&config, SyncConfig::default()).await;

    let mut writer = CountingWriter::default();
    let stats = engine.run(&converter, &mut writer).await.unwrap();

    assert_eq!(writer.records, 3);
    assert_eq!(writer.finishes, 1);
    assert_eq!(stats.total, None);
}

#[tokio::test]
async fn test_guessed_schema_to_parquet() {
    let server = MockServer::start().await;
    mount_credentials(&server).await;

    Mock::given(method("POST"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": 0, "total": 2,
            "issues": [
                {"id": "1", "key": "PRJ-1", "fields": {
                    "flagged": true, "votes": 3, "ratio": 0.5,
                    "created": "2019-01-01T00:00:00.000+0000", "labels": ["a", "b"]
                }},
                {"id": "2", "key": "PRJ-2", "fields": {
                    "flagged": false, "votes": 1, "ratio": 1.5,
                    "created": "2019-01-02T00:00:00.000+0000", "labels": []
                }}
            ]
        })))
        .mount(&server)
        .await;

    let mut config = JiraConfig::from_yaml_str(&config_yaml(&server.uri(), 50)).unwrap();
    config.dynamic_schema = true;
    config.columns.clear();

    let (mut engine, converter) = prepare(&config, SyncConfig::default()).await;
    let types: Vec<(&str, ColumnType)> = converter
        .schema()
        .columns()
        .iter()
        .map(|c| (c.name.as_str(), c.column_type))
        .collect();
    assert_eq!(
        types,
        vec![
            ("id", ColumnType::String),
            ("key", ColumnType::String),
            ("flagged", ColumnType::Boolean),
            ("votes", ColumnType::Long),
            ("ratio", ColumnType::Double),
            ("created", ColumnType::Timestamp),
            ("labels", ColumnType::Json),
        ]
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("issues.parquet");
    let mut writer =
        ParquetRecordWriter::create(&path, converter.schema(), &ParquetWriterConfig::default())
            .unwrap();
    let stats = engine.run(&converter, &mut writer).await.unwrap();
    assert_eq!(stats.records_synced, 2);

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, 2);
    assert_eq!(batches[0].num_columns(), 7);
}

#[tokio::test]
async fn test_terminal_search_error_is_config_failure() {
    let server = MockServer::start().await;
    mount_credentials(&server).await;
    Mock::given(method("POST"))
        .and(path(SEARCH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorMessages": ["Field 'projct' does not exist or you do not have permission to view it."],
            "errors": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = JiraConfig::from_yaml_str(&config_yaml(&server.uri(), 50)).unwrap();
    let (mut engine, converter) = prepare(&config, SyncConfig::default()).await;

    let mut writer = CountingWriter::default();
    let err = engine.run(&converter, &mut writer).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Configuration error: Field 'projct' does not exist or you do not have permission to view it."
    );
    assert_eq!(writer.records, 0);
    assert_eq!(writer.finishes, 0);
}
