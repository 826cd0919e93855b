//! Execution engine module
//!
//! The pagination driver: fetches pages in server order and feeds every
//! issue through the converter into the record writer.
//!
//! # Overview
//!
//! - `SyncEngine` - Drives `Start → Fetching → MorePages | Exhausted → Done`
//! - `SyncConfig` - Preview mode and credential check switches
//! - `SyncStats` - Pages, records and duration of a run

mod types;

pub use types::{DriverState, SyncConfig, SyncStats};

use crate::client::JiraClient;
use crate::config::JiraConfig;
use crate::convert::RecordConverter;
use crate::error::Result;
use crate::output::RecordWriter;
use crate::pagination::{pages_needed, Cursor};
use std::time::Instant;
use tracing::{debug, info};

/// Sync engine for orchestrating issue extraction
#[derive(Debug)]
pub struct SyncEngine {
    /// Search client
    client: JiraClient,
    /// Issues requested per page
    page_size: u32,
    /// Sync configuration
    config: SyncConfig,
    /// Current driver state
    state: DriverState,
    /// Statistics
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: JiraClient, page_size: u32) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
            config: SyncConfig::default(),
            state: DriverState::Start,
            stats: SyncStats::default(),
        }
    }

    /// Validate `config` and build an engine for it
    pub fn from_config(config: &JiraConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(JiraClient::new(config)?, config.page_size()))
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the search client
    pub fn client(&self) -> &JiraClient {
        &self.client
    }

    /// Get the driver state
    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Leave `Start`: check credentials if configured and arm the first fetch
    ///
    /// Does nothing outside `Start`.
    pub async fn start(&mut self) -> Result<()> {
        if self.state != DriverState::Start {
            return Ok(());
        }
        if self.config.check_credentials {
            self.client.check_credentials().await?;
            debug!("Credentials accepted");
        }
        self.state = DriverState::Fetching(Cursor::Start);
        Ok(())
    }

    /// Run until every page is written and the writer is finished
    ///
    /// A page is fully written before the next one is requested. A failed
    /// fetch writes nothing for that page and leaves the driver at the
    /// failing cursor. A conversion or writer failure also leaves the driver
    /// at the cursor of the page being written.
    pub async fn run(
        &mut self,
        converter: &RecordConverter,
        writer: &mut dyn RecordWriter,
    ) -> Result<SyncStats> {
        let started = Instant::now();
        self.start().await?;
        info!(
            "Starting sync{}",
            if self.config.preview { " (preview)" } else { "" }
        );

        loop {
            match std::mem::take(&mut self.state) {
                DriverState::Start => self.start().await?,
                DriverState::Fetching(cursor) => {
                    let page = match self.client.search(&cursor, self.page_size).await {
                        Ok(page) => page,
                        Err(e) => {
                            self.state = DriverState::Fetching(cursor);
                            return Err(e);
                        }
                    };
                    self.stats.add_page();

                    if self.stats.pages_fetched == 1 {
                        if let Some(total) = page.total {
                            info!(
                                "{total} issues to fetch in {} pages",
                                pages_needed(total, self.page_size)
                            );
                        }
                    }
                    if page.total.is_some() {
                        self.stats.total = page.total;
                    }

                    for issue in &page.issues {
                        if let Err(e) = converter.add_record(issue, writer) {
                            self.state = DriverState::Fetching(cursor);
                            return Err(e);
                        }
                    }
                    self.stats.add_records(page.len());
                    debug!(
                        "Page {} written, {} records so far",
                        self.stats.pages_fetched, self.stats.records_synced
                    );

                    self.state = match page.next {
                        Some(next) if !self.config.preview => DriverState::MorePages(next),
                        _ => DriverState::Exhausted,
                    };
                }
                DriverState::MorePages(cursor) => {
                    self.state = DriverState::Fetching(cursor);
                }
                DriverState::Exhausted => {
                    if let Err(e) = writer.finish() {
                        self.state = DriverState::Exhausted;
                        return Err(e);
                    }
                    self.state = DriverState::Done;
                }
                DriverState::Done => {
                    self.state = DriverState::Done;
                    break;
                }
            }
        }

        self.stats
            .set_duration(started.elapsed().as_millis() as u64);
        info!(
            "Sync finished: {} records in {} pages",
            self.stats.records_synced, self.stats.pages_fetched
        );
        Ok(self.stats.clone())
    }
}
