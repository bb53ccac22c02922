//! Single-consumer output table writer
//!
//! A [`SinkWriter`] owns one output file. Creating it writes the `URL,Status`
//! header and flushes (state `Open`). Each received record with a non-empty
//! URL becomes one row, flushed before the next message is taken. On
//! [`SinkMessage::Complete`] the file is flushed and closed (state `Closed`)
//! and the final size is reported.
//!
//! Records and the completion signal share one channel, so completion can
//! never overtake a record sent before it.

use crate::error::{PipelineError, Result};
use crate::record::FetchRecord;
use crate::table::{Delimiter, OUTPUT_HEADERS};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Message from a row source to its sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkMessage {
    Record(FetchRecord),
    Complete,
}

/// Lifecycle of a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Open,
    Closed,
}

/// What a closed sink left on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkSummary {
    pub path: PathBuf,
    pub rows_written: u64,
    pub bytes_written: u64,
}

/// Appends `(URL, Status)` rows to one output table
pub struct SinkWriter {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    rows_written: u64,
}

impl SinkWriter {
    /// Create (truncate) `path` and write the header row
    pub fn create(path: impl AsRef<Path>, delimiter: Delimiter) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| PipelineError::file_io(&path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .from_writer(file);

        writer
            .write_record(OUTPUT_HEADERS)
            .map_err(|e| PipelineError::table(&path, e))?;
        writer.flush().map_err(|e| PipelineError::file_io(&path, e))?;

        debug!(path = %path.display(), "Opened output table");
        Ok(Self {
            path,
            writer: Some(writer),
            rows_written: 0,
        })
    }

    pub fn state(&self) -> SinkState {
        if self.writer.is_some() {
            SinkState::Open
        } else {
            SinkState::Closed
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row and flush; records without a URL are dropped
    ///
    /// Returns whether a row was written.
    pub fn write_record(&mut self, record: &FetchRecord) -> Result<bool> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            PipelineError::TaskFailed(format!("sink for '{}' is closed", self.path.display()))
        })?;

        if !record.is_emittable() {
            return Ok(false);
        }

        writer
            .write_record(record.to_row())
            .map_err(|e| PipelineError::table(&self.path, e))?;
        writer.flush().map_err(|e| PipelineError::file_io(&self.path, e))?;

        self.rows_written += 1;
        Ok(true)
    }

    /// Flush, close the file and report its final size
    pub fn close(&mut self) -> Result<SinkSummary> {
        let writer = self.writer.take().ok_or_else(|| {
            PipelineError::TaskFailed(format!("sink for '{}' is already closed", self.path.display()))
        })?;

        let file = writer
            .into_inner()
            .map_err(|e| {
                let io = std::io::Error::new(e.error().kind(), e.error().to_string());
                PipelineError::file_io(&self.path, io)
            })?;
        let bytes_written = file
            .metadata()
            .map_err(|e| PipelineError::file_io(&self.path, e))?
            .len();
        drop(file);

        info!(
            path = %self.path.display(),
            rows = self.rows_written,
            bytes = bytes_written,
            "Closed output table"
        );

        Ok(SinkSummary {
            path: self.path.clone(),
            rows_written: self.rows_written,
            bytes_written,
        })
    }

    /// Consume messages until completion, then close
    ///
    /// Blocks the calling thread. A channel closed without [`SinkMessage::Complete`]
    /// still closes the table cleanly.
    pub fn run(mut self, mut messages: mpsc::Receiver<SinkMessage>) -> Result<SinkSummary> {
        loop {
            match messages.blocking_recv() {
                Some(SinkMessage::Record(record)) => {
                    self.write_record(&record)?;
                },
                Some(SinkMessage::Complete) => break,
                None => {
                    warn!(path = %self.path.display(), "Row source went away without completing");
                    break;
                },
            }
        }

        self.close()
    }

    /// Run the sink on the blocking pool
    pub fn spawn(self, messages: mpsc::Receiver<SinkMessage>) -> JoinHandle<Result<SinkSummary>> {
        tokio::task::spawn_blocking(move || self.run(messages))
    }
}

impl Drop for SinkWriter {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
    }
}
