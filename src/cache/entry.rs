//! Cache Entry Module
//!
//! Defines a single cached value together with its expiry timestamp.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A cached value with an optional expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds), None = never expires
    pub expires_at: Option<u64>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry that lives for `ttl_seconds`.
    ///
    /// A TTL of zero or less means the entry never expires.
    pub fn new(value: V, ttl_seconds: i64) -> Self {
        let now = current_timestamp_ms();
        let expires_at = if ttl_seconds <= 0 {
            None
        } else {
            Some(now.saturating_add((ttl_seconds as u64).saturating_mul(1000)))
        };

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
