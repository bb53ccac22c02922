//! Error types for the fetch-and-cache pipeline
//!
//! Errors fall into two classes. Per-URL errors ([`PipelineError::InvalidUrl`],
//! [`PipelineError::Transport`], [`PipelineError::BodyRead`]) are logged by the
//! row source and the row is dropped. Everything else is structural and aborts
//! the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error taxonomy for resolving URLs and moving rows between tables
#[derive(Error, Debug)]
pub enum PipelineError {
    /// URL is not an absolute http(s) URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection, TLS or timeout failure before a response arrived
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response arrived but its body could not be read to completion
    #[error("Failed to read response body from '{url}': {source}")]
    BodyRead {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Row is shorter than the configured URL column requires
    #[error("Row {line} of '{}' has {fields} field(s) but the URL column is {column}. Check --url-column and --csv-separator.", path.display())]
    ColumnOutOfBounds {
        path: PathBuf,
        line: u64,
        column: usize,
        fields: usize,
    },

    /// Input table could not be parsed
    #[error("Malformed input table '{}': {source}", path.display())]
    MalformedTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Open, create, stat or write failure on a table file
    #[error("File operation on '{}' failed: {source}. Check file permissions and disk space.", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Field delimiter must be a single ASCII character
    #[error("Invalid delimiter {0:?}: a single ASCII character is required")]
    InvalidDelimiter(char),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A pipeline task panicked or was cancelled
    #[error("Pipeline task failed: {0}")]
    TaskFailed(String),
}

impl PipelineError {
    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a file I/O error for `path`
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed table error, unwrapping I/O failures into [`PipelineError::FileIo`]
    pub fn table(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let path = path.into();
        if let csv::ErrorKind::Io(io) = source.kind() {
            return Self::FileIo {
                path,
                source: std::io::Error::new(io.kind(), io.to_string()),
            };
        }
        Self::MalformedTable { path, source }
    }

    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::InvalidUrl { .. } | Self::Transport { .. } | Self::BodyRead { .. }
        )
    }
}
