//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::JiraClient;
use crate::config::JiraConfig;
use crate::convert::RecordConverter;
use crate::engine::{SyncConfig, SyncEngine, SyncStats};
use crate::error::{Error, Result};
use crate::output::{JsonLinesWriter, ParquetRecordWriter, ParquetWriterConfig, RecordWriter};
use crate::pagination::pages_needed;
use crate::schema::{Column, Schema, SchemaResolver};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter};
use tracing::info;

/// Columns in the shape the config file accepts
#[derive(Serialize)]
struct GuessedColumns<'a> {
    columns: &'a [Column],
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match self.cli.command {
            Commands::Check => self.check().await,
            Commands::Count => self.count().await,
            Commands::Guess => self.guess().await,
            Commands::Preview => self.extract(true).await.map(|_| ()),
            Commands::Run => self.extract(false).await.map(|_| ()),
        }
    }

    /// Load the configuration file
    fn load_config(&self) -> Result<JiraConfig> {
        JiraConfig::load(&self.cli.config)
    }

    /// Validate the configuration and build a client for it
    fn client(&self, config: &JiraConfig) -> Result<JiraClient> {
        config.validate()?;
        JiraClient::new(config)
    }

    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        self.client(&config)?.check_credentials().await?;
        println!("OK");
        Ok(())
    }

    async fn count(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = self.client(&config)?;
        client.check_credentials().await?;

        match client.get_total_count().await? {
            Some(total) => {
                info!(
                    "{} pages at page size {}",
                    pages_needed(total, config.page_size()),
                    config.page_size()
                );
                println!("{total}");
            }
            None => println!("The server does not report a total count"),
        }
        Ok(())
    }

    async fn guess(&self) -> Result<()> {
        let mut config = self.load_config()?;
        config.dynamic_schema = true;
        let client = self.client(&config)?;
        client.check_credentials().await?;

        let schema = SchemaResolver::from_config(&config)?
            .resolve(&client)
            .await?;
        let yaml = serde_yaml::to_string(&GuessedColumns {
            columns: schema.columns(),
        })?;
        print!("{yaml}");
        Ok(())
    }

    /// Resolve the schema, then drive the engine into the selected writer
    async fn extract(&self, preview: bool) -> Result<SyncStats> {
        let config = self.load_config()?;
        let mut engine = SyncEngine::from_config(&config)?
            .with_config(SyncConfig::new().with_preview(preview));
        engine.start().await?;

        let schema = SchemaResolver::from_config(&config)?
            .resolve(engine.client())
            .await?;
        let converter = RecordConverter::new(schema.clone())?;
        let mut writer = self.writer(&schema)?;

        let stats = engine.run(&converter, writer.as_mut()).await?;
        info!(
            "Extracted {} records in {} ms",
            stats.records_synced, stats.duration_ms
        );
        Ok(stats)
    }

    /// Build the record writer for the selected format and destination
    pub(crate) fn writer(&self, schema: &Schema) -> Result<Box<dyn RecordWriter>> {
        match (self.cli.format, &self.cli.output) {
            (OutputFormat::Json, Some(path)) => {
                let file = File::create(path).map_err(|e| {
                    Error::output(format!("Failed to create '{}': {e}", path.display()))
                })?;
                Ok(Box::new(JsonLinesWriter::new(BufWriter::new(file))))
            }
            (OutputFormat::Json, None) => {
                Ok(Box::new(JsonLinesWriter::new(BufWriter::new(io::stdout()))))
            }
            (OutputFormat::Parquet, Some(path)) => Ok(Box::new(ParquetRecordWriter::create(
                path,
                schema,
                &ParquetWriterConfig::default(),
            )?)),
            (OutputFormat::Parquet, None) => Err(Error::config(
                "Parquet output needs an output file (use -o)",
            )),
        }
    }
}
