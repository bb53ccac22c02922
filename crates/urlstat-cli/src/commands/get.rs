//! `urlstat get` command implementation
//!
//! Fetches a single URL with the same fetcher the batch pipeline uses and
//! prints its status, bypassing the cache.

use crate::error::Result;
use crate::progress;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;
use urlstat_core::{Delimiter, Fetcher, HttpFetcher, SinkWriter};

/// Arguments for `urlstat get`
#[derive(Debug, Clone)]
pub struct GetArgs {
    pub url: String,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub output_separator: char,
}

/// Fetch one URL and report it
pub async fn run(args: GetArgs) -> Result<()> {
    // Validate the delimiter before any network traffic
    let delimiter = Delimiter::new(args.output_separator)?;
    info!(url = %args.url, "Called get command");

    let fetcher = HttpFetcher::new()?;
    let spinner = progress::create_spinner(&format!("Fetching {}...", args.url));
    let result = fetcher.fetch(&args.url).await;
    spinner.finish_and_clear();
    let record = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("Responded with status: {}", record.status);
    }

    if let Some(path) = args.output {
        let mut sink = SinkWriter::create(&path, delimiter)?;
        sink.write_record(&record)?;
        let summary = sink.close()?;
        println!(
            "{} Wrote {} to {}",
            "✓".green(),
            progress::format_bytes(summary.bytes_written),
            summary.path.display()
        );
    }

    Ok(())
}
