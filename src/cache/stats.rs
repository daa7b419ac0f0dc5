//! Cache Statistics Module
//!
//! Tracks listing cache effectiveness: hits, misses, invalidations and expiries.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing how the listing cache is being used.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed because a write invalidated them
    pub invalidations: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Recording ==
    /// Counts a lookup served from the cache.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a lookup that had to go to the store.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts an entry dropped by a write.
    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    /// Counts `count` entries dropped because their TTL elapsed.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Entry Count ==
    /// Updates the snapshot of live entries.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.invalidations, 0);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_invalidation_and_expirations() {
        let mut stats = CacheStats::new();
        stats.record_invalidation();
        stats.record_expirations(3);
        assert_eq!(stats.invalidations, 1);
        assert_eq!(stats.expirations, 3);
    }
}
