//! Stores Module
//!
//! Per-collection data access: validation, duplicate and reference checks,
//! cached listings and cache invalidation on every write.

mod cities;
mod countries;
mod states;

#[cfg(test)]
mod property_tests;

use std::collections::HashMap;

use uuid::Uuid;

pub use cities::CityStore;
pub use countries::CountryStore;
pub use states::StateStore;

use crate::cache::{Listing, SharedCache, CITIES_ALL, COUNTRIES_ALL, STATES_ALL};
use crate::db::{Collection, Document};
use crate::error::{GeoError, Result};
use crate::models::{City, Country, State};

// == Bulk Insert Report ==
/// Outcome of a bulk insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkInsertReport {
    /// Ids of the records actually written
    pub ids: Vec<Uuid>,
    /// Documents that were invalid, duplicated or rejected by the store
    pub skipped: usize,
}

impl BulkInsertReport {
    pub fn inserted(&self) -> usize {
        self.ids.len()
    }
}

// == Listable ==
/// A record type whose full listing is cached under a fixed key.
pub(crate) trait Listable: Document {
    const CACHE_KEY: &'static str;

    fn into_listing(items: Vec<Self>) -> Listing;
    fn from_listing(listing: Listing) -> Option<Vec<Self>>;
}

impl Listable for Country {
    const CACHE_KEY: &'static str = COUNTRIES_ALL;

    fn into_listing(items: Vec<Self>) -> Listing {
        Listing::Countries(items)
    }

    fn from_listing(listing: Listing) -> Option<Vec<Self>> {
        match listing {
            Listing::Countries(items) => Some(items),
            _ => None,
        }
    }
}

impl Listable for State {
    const CACHE_KEY: &'static str = STATES_ALL;

    fn into_listing(items: Vec<Self>) -> Listing {
        Listing::States(items)
    }

    fn from_listing(listing: Listing) -> Option<Vec<Self>> {
        match listing {
            Listing::States(items) => Some(items),
            _ => None,
        }
    }
}

impl Listable for City {
    const CACHE_KEY: &'static str = CITIES_ALL;

    fn into_listing(items: Vec<Self>) -> Listing {
        Listing::Cities(items)
    }

    fn from_listing(listing: Listing) -> Option<Vec<Self>> {
        match listing {
            Listing::Cities(items) => Some(items),
            _ => None,
        }
    }
}

/// Serves the full collection from the cache, querying and caching it on a
/// miss. A listing read while a write invalidated the key is not cached.
pub(crate) async fn read_all_cached<T: Listable>(
    cache: &SharedCache,
    collection: &Collection<T>,
) -> Result<Vec<T>> {
    let generation = {
        let mut guard = cache.write().await;
        if let Some(items) = guard.get(T::CACHE_KEY).and_then(T::from_listing) {
            return Ok(items);
        }
        guard.generation(T::CACHE_KEY)
    };

    let items = collection.all().await?;
    cache.write().await.set_if_current(
        T::CACHE_KEY,
        generation,
        T::into_listing(items.clone()),
        None,
    );
    Ok(items)
}

/// Drops the cached listing for `T` after a write.
pub(crate) async fn invalidate<T: Listable>(cache: &SharedCache) {
    cache.write().await.invalidate(T::CACHE_KEY);
}

// == Country Resolver ==
/// Memoises country lookups while validating a batch.
pub(crate) struct CountryResolver<'a> {
    countries: &'a CountryStore,
    seen: HashMap<String, Option<String>>,
}

impl<'a> CountryResolver<'a> {
    pub(crate) fn new(countries: &'a CountryStore) -> Self {
        Self {
            countries,
            seen: HashMap::new(),
        }
    }

    /// Returns the canonical name of `name`, or a Reference error.
    pub(crate) async fn canonical(&mut self, name: &str) -> Result<String> {
        let key = name.to_lowercase();
        if !self.seen.contains_key(&key) {
            let found = self.countries.read_by_name(name).await?.map(|c| c.name);
            self.seen.insert(key.clone(), found);
        }
        self.seen
            .get(&key)
            .cloned()
            .flatten()
            .ok_or_else(|| GeoError::Reference(format!("country '{}' does not exist", name)))
    }
}
