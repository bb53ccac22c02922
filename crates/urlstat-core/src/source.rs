//! Input table reader
//!
//! Reads rows in order, reduces each to the URL in the configured column and
//! hands the resolved record to the sink. A row that fails to resolve is
//! logged and dropped. A row too short for the URL column, an unparseable row
//! or a closed sink ends the file with an error.
//!
//! The file itself is read on the blocking pool and handed over one URL at a
//! time.

use crate::error::{PipelineError, Result};
use crate::resolver::Resolver;
use crate::sink::SinkMessage;
use crate::table::{extract_url, strip_bom, Delimiter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Per-file row counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub rows_read: u64,
    pub rows_sent: u64,
    pub rows_skipped: u64,
}

/// Reads URLs from one input table
pub struct RowSource {
    path: PathBuf,
    reader: csv::Reader<File>,
    url_column: usize,
}

impl RowSource {
    /// Open `path` for reading; rows carry no header
    pub fn open(path: impl AsRef<Path>, delimiter: Delimiter, url_column: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| PipelineError::file_io(&path, e))?;

        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter.as_byte())
            .from_reader(file);

        Ok(Self {
            path,
            reader,
            url_column,
        })
    }

    /// Every URL in file order, stopping at the first structural error
    ///
    /// Errors carry the physical line a record starts on, so a quoted field
    /// spanning lines does not shift later line numbers.
    pub fn urls(&mut self) -> impl Iterator<Item = Result<String>> + '_ {
        let path = self.path.clone();
        let column = self.url_column;

        self.reader
            .records()
            .enumerate()
            .map(move |(index, row)| {
                let mut row = row.map_err(|e| PipelineError::table(&path, e))?;
                let line = row
                    .position()
                    .map_or(index as u64 + 1, |position| position.line());
                if index == 0 {
                    row = strip_first_field_bom(&row);
                }
                extract_url(&row, column, &path, line)
            })
    }

    /// Read rows on the blocking pool, one URL ahead of the consumer
    ///
    /// The reader stops after the first error or once the receiver is dropped.
    fn spawn_reader(mut self) -> (mpsc::Receiver<Result<String>>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::task::spawn_blocking(move || {
            for url in self.urls() {
                let failed = url.is_err();
                if tx.blocking_send(url).is_err() || failed {
                    break;
                }
            }
        });
        (rx, handle)
    }

    /// Resolve every row and send the records to `sink`, then signal completion
    ///
    /// On a fatal error the completion signal is not sent; dropping the sender
    /// lets the sink close what it has.
    pub async fn run(
        self,
        resolver: &Resolver,
        sink: mpsc::Sender<SinkMessage>,
    ) -> Result<SourceStats> {
        let mut stats = SourceStats::default();
        let path = self.path.clone();
        let (mut urls, reader) = self.spawn_reader();

        while let Some(url) = urls.recv().await {
            let url = url?;
            stats.rows_read += 1;

            let record = match resolver.resolve(&url).await {
                Ok(record) => record,
                Err(e) if !e.is_fatal() => {
                    warn!(file = %path.display(), row = stats.rows_read, url = %url, error = %e, "Skipping row");
                    stats.rows_skipped += 1;
                    continue;
                },
                Err(e) => return Err(e),
            };

            if sink.send(SinkMessage::Record(record)).await.is_err() {
                return Err(PipelineError::TaskFailed(format!(
                    "sink for '{}' stopped accepting rows",
                    path.display()
                )));
            }
            stats.rows_sent += 1;
        }

        reader.await.map_err(|e| {
            PipelineError::TaskFailed(format!("reader for '{}': {}", path.display(), e))
        })?;

        // A sink that already failed reports its own error when joined
        let _ = sink.send(SinkMessage::Complete).await;
        debug!(file = %path.display(), rows = stats.rows_read, "Finished reading input table");
        Ok(stats)
    }
}

fn strip_first_field_bom(row: &csv::StringRecord) -> csv::StringRecord {
    row.iter()
        .enumerate()
        .map(|(i, field)| if i == 0 { strip_bom(field) } else { field })
        .collect()
}
