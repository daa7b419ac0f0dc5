//! Registry Module
//!
//! Owns the three stores and the order in which deletes cascade:
//! country → its states → each state's cities → any other city of the
//! country.
//!
//! Cascades are not transactional. Each step is its own store request and a
//! failure stops the cascade with the earlier steps already applied. Running
//! the same delete again finishes the job, because every step only removes
//! what is still there.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{shared_cache, SharedCache};
use crate::db::Database;
use crate::error::Result;
use crate::models::{City, Country, NewCity, NewCountry, NewState, State, StateUpdate};
use crate::stores::{BulkInsertReport, CityStore, CountryStore, StateStore};

// == Cascade Report ==
/// Records removed by a (possibly cascading) delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub countries: u64,
    pub states: u64,
    pub cities: u64,
}

impl CascadeReport {
    pub fn is_empty(&self) -> bool {
        self.countries == 0 && self.states == 0 && self.cities == 0
    }

    fn absorb(&mut self, other: CascadeReport) {
        self.countries += other.countries;
        self.states += other.states;
        self.cities += other.cities;
    }
}

// == Geo Registry ==
#[derive(Debug, Clone)]
pub struct GeoRegistry {
    pub countries: CountryStore,
    pub states: StateStore,
    pub cities: CityStore,
    db: Database,
    cache: SharedCache,
}

impl GeoRegistry {
    /// Wires the stores to `db`, sharing one listing cache.
    pub fn new(db: Database, cache: SharedCache) -> Self {
        Self {
            countries: CountryStore::new(&db, cache.clone()),
            states: StateStore::new(&db, cache.clone()),
            cities: CityStore::new(&db, cache.clone()),
            db,
            cache,
        }
    }

    /// A registry over a fresh, empty database.
    pub fn in_memory(cache_ttl: i64) -> Self {
        Self::new(Database::new(), shared_cache(cache_ttl))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Creation ==
    pub async fn create_country(&self, doc: NewCountry) -> Result<Country> {
        self.countries.create(doc).await
    }

    pub async fn create_state(&self, doc: NewState) -> Result<State> {
        self.states.create(doc, &self.countries).await
    }

    pub async fn create_states(&self, docs: Vec<NewState>) -> Result<BulkInsertReport> {
        self.states.create_bulk(docs, &self.countries).await
    }

    pub async fn create_city(&self, doc: NewCity) -> Result<City> {
        self.cities.create(doc, &self.countries).await
    }

    pub async fn create_cities(&self, docs: Vec<NewCity>) -> Result<BulkInsertReport> {
        self.cities.create_bulk(docs, &self.countries).await
    }

    pub async fn update_state(&self, code: &str, update: StateUpdate) -> Result<u64> {
        self.states.update(code, update, &self.countries).await
    }

    // == Cascading Deletes ==
    /// Deletes the cities of state `code`, then the state itself.
    ///
    /// Cities are removed even when the state record is already gone, which
    /// lets a retry clean up after an interrupted cascade.
    pub async fn delete_state(&self, code: &str) -> Result<CascadeReport> {
        let cities = self.cities.delete_by_state(code).await?;

        let states = match self.states.delete(code).await {
            Ok(n) => n,
            Err(err) => {
                warn!(
                    state = %code,
                    cities_removed = cities,
                    error = %err,
                    "State delete failed after its cities were removed"
                );
                return Err(err);
            }
        };

        let report = CascadeReport {
            countries: 0,
            states,
            cities,
        };
        if !report.is_empty() {
            info!(state = %code, cities, "State deleted");
        }
        Ok(report)
    }

    /// Deletes every state of country `name` (with their cities), every
    /// remaining city of the country, then the country itself.
    ///
    /// An unknown country removes nothing. The country record goes last, so
    /// as long as it exists a retry can resolve it and finish the cascade.
    pub async fn delete_country(&self, name: &str) -> Result<CascadeReport> {
        let canonical = match self.countries.read_by_name(name).await? {
            Some(country) => country.name,
            None => {
                debug!(country = %name.trim(), "No country to delete");
                return Ok(CascadeReport::default());
            }
        };

        let mut report = CascadeReport::default();
        for state in self.states.read_by_country(&canonical).await? {
            match self.delete_state(&state.code).await {
                Ok(removed) => report.absorb(removed),
                Err(err) => {
                    warn!(
                        country = %canonical,
                        states_removed = report.states,
                        cities_removed = report.cities,
                        "Country cascade interrupted"
                    );
                    return Err(err);
                }
            }
        }

        match self.cities.delete_by_country(&canonical).await {
            Ok(n) => report.cities += n,
            Err(err) => {
                warn!(
                    country = %canonical,
                    states_removed = report.states,
                    cities_removed = report.cities,
                    error = %err,
                    "Country city sweep failed after its states were removed"
                );
                return Err(err);
            }
        }

        report.countries = match self.countries.delete_by_name(&canonical).await {
            Ok(n) => n,
            Err(err) => {
                warn!(
                    country = %canonical,
                    states_removed = report.states,
                    cities_removed = report.cities,
                    error = %err,
                    "Country delete failed after its states were removed"
                );
                return Err(err);
            }
        };

        if !report.is_empty() {
            info!(
                country = %canonical,
                states = report.states,
                cities = report.cities,
                "Country deleted"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeoError, StorageError};

    async fn seeded() -> GeoRegistry {
        let registry = GeoRegistry::in_memory(60);
        registry
            .create_country(NewCountry::new("US", "United States"))
            .await
            .unwrap();
        registry
            .create_country(NewCountry::new("CA", "Canada"))
            .await
            .unwrap();
        for (code, name, country) in [
            ("NY", "New York", "United States"),
            ("TX", "Texas", "United States"),
            ("ON", "Ontario", "Canada"),
        ] {
            registry
                .create_state(NewState::new(code, name, country))
                .await
                .unwrap();
        }
        for (name, country, state) in [
            ("Buffalo", "United States", Some("NY")),
            ("Albany", "United States", Some("NY")),
            ("Austin", "United States", Some("TX")),
            ("Toronto", "Canada", Some("ON")),
            ("Dallas", "United States", None),
        ] {
            let mut city = NewCity::new(name, country);
            if let Some(state) = state {
                city = city.with_state(state);
            }
            registry.create_city(city).await.unwrap();
        }
        registry
    }

    #[tokio::test]
    async fn test_delete_state_cascades_to_its_cities_only() {
        let registry = seeded().await;

        let report = registry.delete_state("NY").await.unwrap();
        assert_eq!(
            report,
            CascadeReport {
                countries: 0,
                states: 1,
                cities: 2
            }
        );

        let cities = registry.cities.read_all().await.unwrap();
        let names: Vec<_> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Austin", "Toronto", "Dallas"]);
        assert!(registry.states.read_by_code("NY").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_country_cascades() {
        let registry = seeded().await;
        registry.cities.read_all().await.unwrap();
        registry.states.read_all().await.unwrap();

        let report = registry.delete_country("united states").await.unwrap();
        assert_eq!(
            report,
            CascadeReport {
                countries: 1,
                states: 2,
                cities: 4
            }
        );

        assert_eq!(registry.countries.read_all().await.unwrap().len(), 1);
        assert_eq!(registry.states.read_all().await.unwrap().len(), 1);
        let cities = registry.cities.read_all().await.unwrap();
        assert_eq!(cities.len(), 1);
        assert!(cities.iter().all(|c| c.country == "Canada"));
    }

    #[tokio::test]
    async fn test_delete_country_removes_cities_under_foreign_state_codes() {
        let registry = seeded().await;
        registry
            .create_city(NewCity::new("Detroit", "United States").with_state("ON"))
            .await
            .unwrap();

        let report = registry.delete_country("United States").await.unwrap();
        assert_eq!(report.cities, 5);

        let cities = registry.cities.read_all().await.unwrap();
        let names: Vec<_> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Toronto"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_country_is_empty() {
        let registry = seeded().await;
        let report = registry.delete_country("Atlantis").await.unwrap();
        assert!(report.is_empty());
        assert_eq!(registry.states.read_all().await.unwrap().len(), 3);
        assert_eq!(registry.cities.read_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_delete_state_retry_removes_orphans() {
        let registry = seeded().await;
        registry.states.delete("NY").await.unwrap();

        let report = registry.delete_state("NY").await.unwrap();
        assert_eq!(report.states, 0);
        assert_eq!(report.cities, 2);
    }

    #[tokio::test]
    async fn test_cascade_propagates_storage_failure() {
        let registry = seeded().await;
        registry.database().disconnect();

        let err = registry.delete_country("United States").await.unwrap_err();
        assert!(matches!(
            err,
            GeoError::Storage(StorageError::Unavailable(_))
        ));

        registry.database().reconnect();
        assert_eq!(registry.countries.read_all().await.unwrap().len(), 2);
    }
}
