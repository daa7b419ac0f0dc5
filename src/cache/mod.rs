//! Cache Module
//!
//! In-memory TTL cache used to serve "all records" listings.

mod entry;
mod stats;
mod ttl;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use ttl::{Generation, TtlCache, DEFAULT_TTL_SECS};

use crate::models::{City, Country, State};

// == Cache Keys ==
pub const COUNTRIES_ALL: &str = "countries:all";
pub const STATES_ALL: &str = "states:all";
pub const CITIES_ALL: &str = "cities:all";

// == Listing ==
/// A cached full-collection listing.
#[derive(Debug, Clone)]
pub enum Listing {
    Countries(Vec<Country>),
    States(Vec<State>),
    Cities(Vec<City>),
}

/// Listing cache shared by every store.
pub type SharedCache = Arc<RwLock<TtlCache<Listing>>>;

/// Creates a shared listing cache with the given default TTL in seconds.
pub fn shared_cache(default_ttl: i64) -> SharedCache {
    Arc::new(RwLock::new(TtlCache::new(default_ttl)))
}
