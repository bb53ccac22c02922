//! `urlstat from-csv` command implementation
//!
//! Resolves the URLs of one input table, or of every table in the input
//! directory concurrently, into `<name>_results.csv` output tables.

use crate::config::Config;
use crate::error::Result;
use crate::progress;
use crate::workspace;
use colored::Colorize;
use std::sync::Arc;
use tracing::info;
use urlstat_core::pipeline::{self, FileJob};
use urlstat_core::{Delimiter, HttpFetcher, Resolver, TtlCache};

/// Arguments for `urlstat from-csv`
#[derive(Debug, Clone)]
pub struct FromCsvArgs {
    /// Single table to process; all tables when absent
    pub filename: Option<String>,
    pub url_column: usize,
    pub csv_separator: char,
    /// Defaults to `csv_separator`
    pub output_separator: Option<char>,
    /// Empty the output directory first
    pub clean: bool,
}

/// Resolver over a fresh cache sized by `config`
pub fn build_resolver(config: &Config) -> Result<Arc<Resolver>> {
    let cache = Arc::new(TtlCache::new(config.cache_lifespan));
    let fetcher = Arc::new(HttpFetcher::new()?);
    Ok(Arc::new(Resolver::new(cache, fetcher)))
}

/// Process input tables into output tables
pub async fn run(config: &Config, args: FromCsvArgs) -> Result<()> {
    let input_delimiter = Delimiter::new(args.csv_separator)?;
    let output_delimiter = match args.output_separator {
        Some(c) => Delimiter::new(c)?,
        None => input_delimiter,
    };

    workspace::prepare_dirs(&config.input_dir, &config.output_dir)?;

    if args.clean {
        let removed = workspace::clean_directory(&config.output_dir)?;
        if !removed.is_empty() {
            println!(
                "{} Cleaned {} file(s) from {}",
                "✓".green(),
                removed.len(),
                config.output_dir.display()
            );
        }
    }

    let inputs = match args.filename.as_deref() {
        Some(name) => vec![workspace::input_table_path(&config.input_dir, name)?],
        None => pipeline::find_input_tables(&config.input_dir)?,
    };

    if inputs.is_empty() {
        println!(
            "No input tables found in {}. Add .csv files there and run again.",
            config.input_dir.display()
        );
        return Ok(());
    }

    let jobs: Vec<FileJob> = inputs
        .into_iter()
        .map(|input| {
            FileJob::for_input(input, &config.output_dir)
                .url_column(args.url_column)
                .input_delimiter(input_delimiter)
                .output_delimiter(output_delimiter)
        })
        .collect();

    info!(
        tables = jobs.len(),
        url_column = args.url_column,
        separator = %input_delimiter,
        "Called from-csv command"
    );

    let resolver = build_resolver(config)?;
    let spinner = progress::create_spinner(&format!("Resolving {} table(s)...", jobs.len()));
    let result = pipeline::process_all(resolver.clone(), jobs).await;
    spinner.finish_and_clear();
    let reports = result?;

    for report in &reports {
        println!(
            "{} {} → {} ({} written, {} skipped)",
            "✓".green(),
            report.input.display(),
            report.output.display(),
            report.rows_written,
            report.rows_skipped
        );
        println!(
            "  Wrote {} to {}",
            progress::format_bytes(report.bytes_written),
            report.output.display()
        );
    }

    let stats = resolver.stats();
    println!(
        "\n{} Done: {} table(s), {} fetch(es), {} cache hit(s), {} failure(s)",
        "✓".green().bold(),
        reports.len(),
        stats.fetches,
        stats.cache_hits,
        stats.failures
    );

    Ok(())
}
