//! Time-bounded, thread-safe record cache
//!
//! Entries are stamped on store and judged on read: an entry is valid while
//! `now - last_updated < lifespan`. Stale entries stay in the map until they
//! are overwritten or deleted; there is no sweeper.
//!
//! One `RwLock` guards the whole map. Loads share the lock, stores and deletes
//! take it exclusively.

use crate::clock::{Clock, SystemClock};
use crate::record::FetchRecord;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Cached value with the moment it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub last_updated: Instant,
}

/// URL-keyed cache with lazy expiry
pub struct TtlCache<V = FetchRecord> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    lifespan: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache on the system clock
    pub fn new(lifespan: Duration) -> Self {
        Self::with_clock(lifespan, Arc::new(SystemClock))
    }

    /// Create an empty cache on the given clock
    pub fn with_clock(lifespan: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            lifespan,
            clock,
        }
    }

    /// Insert or overwrite `key`, stamping the current time
    pub fn store(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let last_updated = self.clock.now();
        trace!(key = %key, "Cache store");
        self.entries.write().insert(key, CacheEntry { value, last_updated });
    }

    /// Return the value for `key` if present and younger than the lifespan
    ///
    /// A zero lifespan never serves anything.
    pub fn load(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.read();
        let entry = entries.get(key)?;

        if now.saturating_duration_since(entry.last_updated) < self.lifespan {
            Some(entry.value.clone())
        } else {
            trace!(key = %key, "Cache entry expired");
            None
        }
    }

    /// Remove `key`; no-op if absent
    pub fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Number of entries held, stale ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lifespan(&self) -> Duration {
        self.lifespan
    }
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.read().len())
            .field("lifespan", &self.lifespan)
            .finish()
    }
}
