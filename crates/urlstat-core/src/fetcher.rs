//! HTTP fetcher
//!
//! Issues one GET per URL and maps the response to a [`FetchRecord`]. The body
//! is read to completion before the record is returned. No retries and no
//! timeout beyond the client default.

use crate::error::{PipelineError, Result};
use crate::record::FetchRecord;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

/// Resolves a single URL to its response metadata
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchRecord>;
}

/// Check that `raw` is an absolute http(s) URL
pub fn validate_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw).map_err(|e| PipelineError::invalid_url(raw, e))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(PipelineError::invalid_url(
            raw,
            format!("unsupported scheme '{}'", other),
        )),
    }
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default client (redirects followed)
    pub fn new() -> Result<Self> {
        Self::from_builder(
            Client::builder().user_agent(concat!("urlstat/", env!("CARGO_PKG_VERSION"))),
        )
    }

    /// Create a fetcher from a configured client builder
    pub fn from_builder(builder: ClientBuilder) -> Result<Self> {
        let client = builder.build().map_err(PipelineError::HttpClient)?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchRecord> {
        let requested = validate_url(url)?;
        debug!(url = %url, "Fetching");

        let response = self
            .client
            .get(requested.clone())
            .send()
            .await
            .map_err(|e| PipelineError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status().as_u16();
        // Keep the caller's spelling unless a redirect moved us elsewhere
        let request_url = if response.url() == &requested {
            url.to_string()
        } else {
            response.url().to_string()
        };

        let body = response.text().await.map_err(|e| PipelineError::BodyRead {
            url: url.to_string(),
            source: e,
        })?;

        debug!(url = %url, status, final_url = %request_url, bytes = body.len(), "Fetched");
        Ok(FetchRecord::new(status, request_url, body))
    }
}
