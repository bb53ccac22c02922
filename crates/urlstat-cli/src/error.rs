//! Error types for urlstat CLI
//!
//! User-facing errors with a hint on how to fix the problem.

use thiserror::Error;
use urlstat_core::PipelineError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    /// Fetch or table processing failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Named input table does not exist
    #[error("Input table not found: '{0}'. Place it in the input directory or pass --input-dir.")]
    InputNotFound(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables and flags.")]
    Config(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON output failed
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Full `source()` chain, outermost first
    pub fn diagnostic(&self) -> Vec<String> {
        let mut chain = vec![self.to_string()];
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            let text = cause.to_string();
            if chain.last() != Some(&text) {
                chain.push(text);
            }
            current = cause.source();
        }
        chain
    }
}
