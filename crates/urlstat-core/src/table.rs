//! Row-delimited table helpers shared by the row source and the sink

use crate::error::{PipelineError, Result};
use std::path::Path;

/// Byte-order mark some editors prepend to the first field of a file
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Output table headers
pub const OUTPUT_HEADERS: [&str; 2] = ["URL", "Status"];

/// Single-byte field delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(u8);

impl Delimiter {
    pub const COMMA: Delimiter = Delimiter(b',');

    pub fn new(c: char) -> Result<Self> {
        if c.is_ascii() && c != '\n' && c != '\r' && c != '"' {
            Ok(Self(c as u8))
        } else {
            Err(PipelineError::InvalidDelimiter(c))
        }
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::COMMA
    }
}

impl TryFrom<char> for Delimiter {
    type Error = PipelineError;

    fn try_from(c: char) -> Result<Self> {
        Self::new(c)
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}

/// Strip a leading byte-order mark
pub fn strip_bom(field: &str) -> &str {
    field.strip_prefix(BYTE_ORDER_MARK).unwrap_or(field)
}

/// Pull the URL out of `column`, failing if the row is too short
pub fn extract_url(
    fields: &csv::StringRecord,
    column: usize,
    path: &Path,
    line: u64,
) -> Result<String> {
    let value = fields
        .get(column)
        .ok_or_else(|| PipelineError::ColumnOutOfBounds {
            path: path.to_path_buf(),
            line,
            column,
            fields: fields.len(),
        })?;

    Ok(value.trim().to_string())
}
