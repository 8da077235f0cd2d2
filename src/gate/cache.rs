// Response cache with TTL expiry and bounded LRU eviction

use crate::metrics;
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// A generated formula with its one-sentence explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaResult {
    pub formula: String,
    pub explanation: String,
}

struct CacheEntry {
    result: FormulaResult,
    created_at: Instant,
}

/// Snapshot of cache activity, exposed via /health and /metrics.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

struct Inner {
    entries: LruCache<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Response cache keyed by normalized input.
///
/// Entries expire `ttl` after insertion and are replaced unconditionally on
/// insert, so there is at most one live entry per key. Keys carry no client
/// identity: identical requests produce identical formulas, so the cache is
/// shared across clients. Capacity is bounded; the least recently used entry
/// is evicted when full.
pub struct ResponseCache {
    inner: Mutex<Inner>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
            ttl,
        }
    }

    /// Return the stored result for `key` if a fresh entry exists.
    ///
    /// An entry read at or past its TTL behaves as absent and is dropped so
    /// occupancy numbers stay honest.
    pub fn get(&self, key: &str) -> Option<FormulaResult> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<FormulaResult> {
        let mut inner = self.inner.lock();
        let lookup = inner.entries.get(key).map(|entry| {
            if now.duration_since(entry.created_at) < self.ttl {
                Some(entry.result.clone())
            } else {
                None
            }
        });

        match lookup {
            Some(Some(result)) => {
                inner.hits += 1;
                metrics::record_cache_hit();
                Some(result)
            }
            Some(None) => {
                inner.entries.pop(key);
                inner.misses += 1;
                metrics::record_cache_miss();
                metrics::update_cache_entries(inner.entries.len());
                None
            }
            None => {
                inner.misses += 1;
                metrics::record_cache_miss();
                None
            }
        }
    }

    /// Insert or replace the entry for `key` with a fresh timestamp.
    pub fn insert(&self, key: String, result: FormulaResult) {
        self.insert_at(key, result, Instant::now());
    }

    fn insert_at(&self, key: String, result: FormulaResult, now: Instant) {
        let mut inner = self.inner.lock();
        let was_full = inner.entries.len() == usize::from(inner.entries.cap());
        let replaced = inner
            .entries
            .put(key, CacheEntry { result, created_at: now })
            .is_some();
        if was_full && !replaced {
            metrics::record_cache_eviction();
        }
        metrics::record_cache_insert();
        metrics::update_cache_entries(inner.entries.len());
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entries: inner.entries.len(),
        }
    }
}
