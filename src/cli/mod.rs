//! CLI module
//!
//! Command-line interface for the extractor.
//!
//! # Commands
//!
//! - `check` - Validate the config and test the credentials
//! - `count` - Print the number of matching issues
//! - `guess` - Print columns inferred from a sample page
//! - `preview` - Extract the first page only
//! - `run` - Extract every matching issue

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
