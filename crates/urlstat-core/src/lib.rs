//! urlstat Core Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! The concurrent fetch-and-cache pipeline behind the `urlstat` CLI.
//!
//! # Overview
//!
//! - **Fetcher**: one HTTP GET per URL, mapped to a [`FetchRecord`]
//! - **TTL Cache**: URL-keyed records with lazy, read-time expiry
//! - **Resolver**: answers from the cache or fetches and stores
//! - **Row Source / Sink Writer**: one reader and one ordered writer per input table
//! - **Pipeline**: fans out one task pair per input file over a shared resolver
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use urlstat_core::{FileJob, HttpFetcher, Resolver, TtlCache};
//!
//! # async fn run() -> urlstat_core::Result<()> {
//! let cache = Arc::new(TtlCache::new(Duration::from_millis(250)));
//! let resolver = Arc::new(Resolver::new(cache, Arc::new(HttpFetcher::new()?)));
//!
//! let job = FileJob::new("input/links.csv", "output/links_results.csv");
//! let report = urlstat_core::pipeline::process_file(resolver, job).await?;
//! println!("{} rows written", report.rows_written);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod clock;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod sink;
pub mod source;
pub mod table;

// Re-export commonly used types
pub use cache::TtlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PipelineError, Result};
pub use fetcher::{Fetcher, HttpFetcher};
pub use pipeline::{FileJob, FileReport};
pub use record::FetchRecord;
pub use resolver::{Resolver, ResolverStats};
pub use sink::{SinkMessage, SinkSummary, SinkWriter};
pub use table::Delimiter;
