//! TTL Cache Module
//!
//! Key-value cache where every entry carries its own expiry. There is no
//! capacity bound and no eviction other than TTL.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

/// Default TTL in seconds when none is configured.
pub const DEFAULT_TTL_SECS: i64 = 60;

// == Generation ==
/// Snapshot of how many times a key has been invalidated.
///
/// Taken before an expensive recomputation and handed back to
/// [`TtlCache::set_if_current`], so a value computed from data that was
/// overwritten in the meantime is dropped instead of cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

// == TTL Cache ==
/// Cache of arbitrary values with per-entry time-to-live.
///
/// Not synchronised: share it behind a lock.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Generation at which each key was last invalidated
    invalidated_at: HashMap<String, u64>,
    /// Generation of the last `clear`
    cleared_at: u64,
    counter: u64,
    stats: CacheStats,
    default_ttl: i64,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache whose entries live `default_ttl` seconds
    /// unless `set` is given an explicit TTL. Zero or less disables expiry.
    pub fn new(default_ttl: i64) -> Self {
        Self {
            entries: HashMap::new(),
            invalidated_at: HashMap::new(),
            cleared_at: 0,
            counter: 0,
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            debug!(key, "cache entry expired");
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// `ttl` is in seconds; `None` uses the default TTL.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<i64>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
    }

    // == Generation ==
    /// Returns the current invalidation generation of `key`.
    pub fn generation(&self, key: &str) -> Generation {
        let key_gen = self.invalidated_at.get(key).copied().unwrap_or(0);
        Generation(key_gen.max(self.cleared_at))
    }

    // == Set If Current ==
    /// Stores `value` only if `key` has not been invalidated since
    /// `generation` was taken. Returns whether the value was stored.
    pub fn set_if_current(
        &mut self,
        key: &str,
        generation: Generation,
        value: V,
        ttl: Option<i64>,
    ) -> bool {
        if self.generation(key) != generation {
            debug!(key, "discarding listing computed before an invalidation");
            return false;
        }
        self.set(key, value, ttl);
        true
    }

    // == Invalidate ==
    /// Removes `key` unconditionally. Absent keys are not an error.
    pub fn invalidate(&mut self, key: &str) {
        self.counter += 1;
        self.invalidated_at.insert(key.to_string(), self.counter);
        if self.entries.remove(key).is_some() {
            self.stats.record_invalidation();
        }
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.counter += 1;
        self.cleared_at = self.counter;
        self.entries.clear();
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        removed
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}
