//! Cache-first URL resolution
//!
//! [`Resolver::resolve`] answers from the cache when it holds a valid record
//! and otherwise fetches, stores and returns the fresh record.
//!
//! The load / fetch / store sequence is not atomic. Two concurrent calls for
//! the same URL can both miss and both fetch; the cache then holds whichever
//! store landed last. Sequential calls within the lifespan fetch once.

use crate::cache::TtlCache;
use crate::error::Result;
use crate::fetcher::{validate_url, Fetcher};
use crate::record::FetchRecord;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Counters describing how requests were answered
///
/// `fetches` counts only requests that went to the network; a URL rejected
/// before sending counts as a failure alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub cache_hits: u64,
    pub fetches: u64,
    pub failures: u64,
}

/// Shared front door to the cache and the fetcher
pub struct Resolver {
    cache: Arc<TtlCache<FetchRecord>>,
    fetcher: Arc<dyn Fetcher>,
    cache_hits: AtomicU64,
    fetches: AtomicU64,
    failures: AtomicU64,
}

impl Resolver {
    pub fn new(cache: Arc<TtlCache<FetchRecord>>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            cache,
            fetcher,
            cache_hits: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Resolve `url` from the cache or the network
    ///
    /// Failed fetches are returned to the caller and leave the cache untouched.
    pub async fn resolve(&self, url: &str) -> Result<FetchRecord> {
        if let Some(record) = self.cache.load(url) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(url = %url, "Found cached record");
            return Ok(record);
        }

        if let Err(e) = validate_url(url) {
            self.failures.fetch_add(1, Ordering::Relaxed);
            return Err(e);
        }

        self.fetches.fetch_add(1, Ordering::Relaxed);
        let record = match self.fetcher.fetch(url).await {
            Ok(record) => record,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            },
        };

        self.cache.store(url, record.clone());
        Ok(record)
    }

    pub fn cache(&self) -> &Arc<TtlCache<FetchRecord>> {
        &self.cache
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("cache", &self.cache)
            .field("stats", &self.stats())
            .finish()
    }
}
