//! Resolved URL metadata

use serde::{Deserialize, Serialize};

/// Result of resolving one URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRecord {
    /// HTTP status code, 0 if no response was obtained
    pub status: u16,

    /// Final URL after redirects
    pub request_url: String,

    /// Full response body
    pub body: String,
}

impl FetchRecord {
    pub fn new(status: u16, request_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            request_url: request_url.into(),
            body: body.into(),
        }
    }

    /// Whether the record may reach an output table
    pub fn is_emittable(&self) -> bool {
        !self.request_url.is_empty()
    }

    /// Output table row: `(URL, Status)`
    pub fn to_row(&self) -> [String; 2] {
        [self.request_url.clone(), self.status.to_string()]
    }
}
