//! Schema resolution
//!
//! Static schemas pass straight through; guess mode fetches one sample page
//! and infers the columns from it.

use super::inference::guess_schema;
use super::types::Schema;
use crate::client::JiraClient;
use crate::config::{JiraConfig, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::pagination::Cursor;
use tracing::{debug, info};

/// Issues fetched to infer a schema
pub const GUESS_SAMPLE_SIZE: u32 = DEFAULT_PAGE_SIZE as u32;

/// How the output schema is obtained
#[derive(Debug, Clone)]
pub enum SchemaResolver {
    /// Columns supplied by configuration
    Static(Schema),
    /// Columns inferred from a sample page
    Guess {
        /// Issues in the sample page
        sample_size: u32,
        /// Pattern given to inferred timestamp columns
        timestamp_format: String,
        /// Timezone given to inferred timestamp columns
        timezone: String,
    },
}

impl SchemaResolver {
    /// Pick the resolver the configuration asks for
    pub fn from_config(config: &JiraConfig) -> Result<Self> {
        if config.dynamic_schema {
            Ok(SchemaResolver::Guess {
                sample_size: GUESS_SAMPLE_SIZE,
                timestamp_format: config.default_timestamp_format.clone(),
                timezone: config.default_timezone.clone(),
            })
        } else {
            Ok(SchemaResolver::Static(config.static_schema()?))
        }
    }

    /// Check if resolving needs a network call
    pub fn is_guess(&self) -> bool {
        matches!(self, SchemaResolver::Guess { .. })
    }

    /// Produce the schema for this run
    pub async fn resolve(&self, client: &JiraClient) -> Result<Schema> {
        match self {
            SchemaResolver::Static(schema) => Ok(schema.clone()),
            SchemaResolver::Guess {
                sample_size,
                timestamp_format,
                timezone,
            } => {
                let page = client.search(&Cursor::Start, *sample_size).await?;
                debug!("Guessing schema from {} sample issues", page.len());

                let schema = guess_schema(&page.issues, timestamp_format, timezone)?;
                info!("Guessed {} columns", schema.len());
                Ok(schema)
            }
        }
    }
}
