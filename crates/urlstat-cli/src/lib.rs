//! urlstat CLI Library
//!
//! Command-line front end for the urlstat fetch-and-cache pipeline.
//!
//! # Overview
//!
//! - **Single URL**: fetch one URL and print its status (`urlstat get`)
//! - **Batch**: resolve the URL column of input tables into result tables
//!   (`urlstat from-csv`), one concurrent pipeline per table sharing one cache

pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod workspace;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// urlstat - resolve URLs to their HTTP status
#[derive(Parser, Debug)]
#[command(name = "urlstat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding input tables [env: URLSTAT_INPUT_DIR]
    #[arg(long, global = true)]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving output tables [env: URLSTAT_OUTPUT_DIR]
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Milliseconds a fetched URL is reused; 0 disables reuse [env: URLSTAT_CACHE_TTL_MS]
    #[arg(long, global = true)]
    pub cache_ttl_ms: Option<u64>,

    /// Print help as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one URL and print its status
    Get {
        /// URL to fetch (e.g., "https://example.com")
        #[arg(long)]
        url: String,

        /// Print the full record (status, final URL, body) as JSON
        #[arg(long)]
        json: bool,

        /// Also write a one-row result table to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field separator for the result table
        #[arg(long, default_value_t = ',')]
        output_separator: char,
    },

    /// Resolve URLs listed in input tables
    FromCsv {
        /// Input table name inside the input directory (".csv" optional); all tables when omitted
        #[arg(short, long)]
        filename: Option<String>,

        /// Zero-based column holding the URL
        #[arg(long, default_value_t = 0)]
        url_column: usize,

        /// Field separator of the input tables
        #[arg(long, default_value_t = ',')]
        csv_separator: char,

        /// Field separator of the output tables (defaults to --csv-separator)
        #[arg(long)]
        output_separator: Option<char>,

        /// Empty the output directory before writing
        #[arg(long)]
        clean: bool,
    },
}

impl Cli {
    /// Configuration from the environment with this invocation's flags on top
    pub fn config(&self) -> Result<Config> {
        Ok(Config::from_env()?.with_overrides(
            self.input_dir.clone(),
            self.output_dir.clone(),
            self.cache_ttl_ms,
        ))
    }
}
