//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Extract JIRA issues into JSON Lines or Parquet
#[derive(Parser, Debug)]
#[command(name = "jira-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true, default_value = "config.yml")]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Output file (stdout when omitted, JSON only)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Validate the configuration and test the credentials
    Check,

    /// Print the number of issues matching the JQL
    Count,

    /// Infer columns from a sample page and print them as YAML
    Guess,

    /// Extract the first page only
    Preview,

    /// Extract every matching issue
    Run,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one record per line)
    Json,
    /// Parquet file
    Parquet,
}
