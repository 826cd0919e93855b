//! Engine types
//!
//! Driver states, run options and statistics for the sync engine.

use crate::pagination::Cursor;

/// Position of the pagination driver
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DriverState {
    /// Nothing fetched yet; credentials not checked
    #[default]
    Start,
    /// Next search call goes out with this cursor
    Fetching(Cursor),
    /// The last page reported more results at this cursor
    MorePages(Cursor),
    /// No more pages; the writer still needs its finish signal
    Exhausted,
    /// Writer finished
    Done,
}

impl DriverState {
    /// Check if the run is complete
    pub fn is_done(&self) -> bool {
        matches!(self, DriverState::Done)
    }
}

/// Options for a sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Stop after the first page
    pub preview: bool,
    /// Verify credentials before the first search
    pub check_credentials: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            preview: false,
            check_credentials: true,
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch only the first page
    #[must_use]
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Enable or disable the credential check
    #[must_use]
    pub fn with_credential_check(mut self, check: bool) -> Self {
        self.check_credentials = check;
        self
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total records written
    pub records_synced: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Matching issues reported by the server, offset mode only
    pub total: Option<u64>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
