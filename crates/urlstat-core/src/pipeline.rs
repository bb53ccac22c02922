//! Multi-file fan-out
//!
//! Each input table gets its own row source task and sink task, joined by a
//! channel of capacity one. Every file shares the same [`Resolver`]. The run
//! finishes when every pair has finished; the first fatal error cancels the
//! rest.

use crate::error::{PipelineError, Result};
use crate::resolver::Resolver;
use crate::sink::SinkWriter;
use crate::source::RowSource;
use crate::table::Delimiter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, instrument};

/// Suffix appended to an input stem to name its output table
pub const OUTPUT_SUFFIX: &str = "_results";

/// Extension of input and output tables
pub const TABLE_EXTENSION: &str = "csv";

/// One input table and where its results go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub url_column: usize,
    pub input_delimiter: Delimiter,
    pub output_delimiter: Delimiter,
}

impl FileJob {
    /// Job reading column 0 of a comma-delimited table
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            url_column: 0,
            input_delimiter: Delimiter::COMMA,
            output_delimiter: Delimiter::COMMA,
        }
    }

    /// Job for `input` with its output named `<stem>_results.csv` inside `output_dir`
    pub fn for_input(input: impl Into<PathBuf>, output_dir: &Path) -> Self {
        let input = input.into();
        let output = output_path_for(&input, output_dir);
        Self::new(input, output)
    }

    pub fn url_column(mut self, column: usize) -> Self {
        self.url_column = column;
        self
    }

    pub fn input_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.input_delimiter = delimiter;
        self
    }

    pub fn output_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.output_delimiter = delimiter;
        self
    }
}

/// Outcome of one processed input table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_read: u64,
    pub rows_written: u64,
    pub rows_skipped: u64,
    pub bytes_written: u64,
}

/// `<output_dir>/<input stem>_results.csv`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    output_dir.join(format!("{}{}.{}", stem, OUTPUT_SUFFIX, TABLE_EXTENSION))
}

/// Every `*.csv` file directly inside `dir`, sorted by name
pub fn find_input_tables(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::file_io(dir, e))?;

    let mut tables = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PipelineError::file_io(dir, e))?.path();
        let is_table = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TABLE_EXTENSION));
        if path.is_file() && is_table {
            tables.push(path);
        }
    }

    tables.sort();
    Ok(tables)
}

/// Run one row source and its sink to completion
#[instrument(skip_all, fields(input = %job.input.display()))]
pub async fn process_file(resolver: Arc<Resolver>, job: FileJob) -> Result<FileReport> {
    let source = RowSource::open(&job.input, job.input_delimiter, job.url_column)?;
    let sink = SinkWriter::create(&job.output, job.output_delimiter)?;

    let (tx, rx) = mpsc::channel(1);
    let sink_handle = sink.spawn(rx);

    let source_result = source.run(&resolver, tx).await;
    let sink_result = sink_handle
        .await
        .map_err(|e| PipelineError::TaskFailed(e.to_string()))?;

    // A sink failure explains a source that saw its channel close
    let (stats, summary) = match (source_result, sink_result) {
        (_, Err(sink_err)) => return Err(sink_err),
        (Err(source_err), Ok(_)) => return Err(source_err),
        (Ok(stats), Ok(summary)) => (stats, summary),
    };

    info!(
        input = %job.input.display(),
        output = %summary.path.display(),
        rows = stats.rows_read,
        written = summary.rows_written,
        skipped = stats.rows_skipped,
        "Processed input table"
    );

    Ok(FileReport {
        input: job.input,
        output: summary.path,
        rows_read: stats.rows_read,
        rows_written: summary.rows_written,
        rows_skipped: stats.rows_skipped,
        bytes_written: summary.bytes_written,
    })
}

/// Process every job concurrently and wait for all of them
///
/// Reports come back in job order. The first error aborts the remaining
/// files and is returned; rows already written stay on disk.
pub async fn process_all(resolver: Arc<Resolver>, jobs: Vec<FileJob>) -> Result<Vec<FileReport>> {
    let mut set = JoinSet::new();
    let total = jobs.len();

    for (index, job) in jobs.into_iter().enumerate() {
        let resolver = resolver.clone();
        set.spawn(async move { (index, process_file(resolver, job).await) });
    }

    let mut reports: Vec<Option<FileReport>> = vec![None; total];
    while let Some(joined) = set.join_next().await {
        let (index, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                set.abort_all();
                return Err(PipelineError::TaskFailed(e.to_string()));
            },
        };

        match result {
            Ok(report) => reports[index] = Some(report),
            Err(e) => {
                error!(error = %e, "Aborting run");
                set.abort_all();
                return Err(e);
            },
        }
    }

    Ok(reports.into_iter().flatten().collect())
}
