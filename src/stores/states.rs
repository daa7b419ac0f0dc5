//! State Store
//!
//! CRUD over the `states` collection. Every state must name an existing
//! country when it is created; codes are letters only and unique.

use tracing::{debug, info};

use crate::cache::SharedCache;
use crate::db::{Collection, Database};
use crate::error::{GeoError, Result};
use crate::models::validation::optional;
use crate::models::{NewState, State, StateUpdate};
use crate::stores::{invalidate, read_all_cached, BulkInsertReport, CountryResolver, CountryStore};

#[derive(Debug, Clone)]
pub struct StateStore {
    states: Collection<State>,
    cache: SharedCache,
}

impl StateStore {
    pub fn new(db: &Database, cache: SharedCache) -> Self {
        Self {
            states: db.states.clone(),
            cache,
        }
    }

    // == Create ==
    /// Validates and inserts a state.
    ///
    /// Checks run in order: country present (`Validation`), country exists
    /// (`Reference`), code alphabetic and name present (`Validation`), code
    /// unused (`Duplicate`).
    pub async fn create(&self, doc: NewState, countries: &CountryStore) -> Result<State> {
        let country = countries.resolve(&doc.country_name()?).await?;
        let record = doc.into_record(&country.name)?;

        self.states
            .insert_one(record.clone())
            .await
            .map_err(GeoError::from_insert)?;
        invalidate::<State>(&self.cache).await;

        info!(code = %record.code, country = %record.country, "State created");
        Ok(record)
    }

    /// Inserts every document that would pass `create`, skipping the rest.
    ///
    /// Duplicate codes, whether already stored or repeated in the batch,
    /// are skipped as well.
    pub async fn create_bulk(
        &self,
        docs: Vec<NewState>,
        countries: &CountryStore,
    ) -> Result<BulkInsertReport> {
        let mut resolver = CountryResolver::new(countries);
        let mut report = BulkInsertReport::default();
        let mut valid = Vec::with_capacity(docs.len());

        for doc in docs {
            let country = match doc.country_name() {
                Ok(name) => name,
                Err(err) => {
                    debug!(error = %err, "Skipping state");
                    report.skipped += 1;
                    continue;
                }
            };
            let canonical = match resolver.canonical(&country).await {
                Ok(name) => name,
                Err(GeoError::Reference(msg)) => {
                    debug!(reason = %msg, "Skipping state");
                    report.skipped += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };
            match doc.into_record(&canonical) {
                Ok(record) => valid.push(record),
                Err(err) => {
                    debug!(error = %err, "Skipping state");
                    report.skipped += 1;
                }
            }
        }

        if valid.is_empty() {
            return Ok(report);
        }

        let outcome = self.states.insert_many(valid).await?;
        report.skipped += outcome.failures.len();
        report.ids = outcome.inserted_ids;

        if report.inserted() > 0 {
            invalidate::<State>(&self.cache).await;
        }
        info!(
            inserted = report.inserted(),
            skipped = report.skipped,
            "Bulk state insert finished"
        );
        Ok(report)
    }

    // == Read ==
    pub async fn read_by_code(&self, code: &str) -> Result<Option<State>> {
        Ok(self.states.find_one(|s| s.code == code).await?)
    }

    /// Every state; served from the listing cache when fresh.
    pub async fn read_all(&self) -> Result<Vec<State>> {
        read_all_cached(&self.cache, &self.states).await
    }

    /// States whose `country` is exactly `country`.
    pub async fn read_by_country(&self, country: &str) -> Result<Vec<State>> {
        Ok(self.states.find(|s| s.country == country).await?)
    }

    // == Update ==
    /// Merges `update` into the state with `code`.
    ///
    /// A new country must exist. Returns the number of modified records:
    /// 0 when no state matched or nothing changed.
    pub async fn update(
        &self,
        code: &str,
        update: StateUpdate,
        countries: &CountryStore,
    ) -> Result<u64> {
        if update.is_empty() {
            return Err(GeoError::validation("no fields to update"));
        }

        let name = optional(update.name.as_deref());
        let country = match optional(update.country.as_deref()) {
            Some(country) => Some(countries.resolve(&country).await?.name),
            None => None,
        };

        let outcome = self
            .states
            .update_one(
                |s| s.code == code,
                move |s| {
                    if let Some(name) = name {
                        s.name = name;
                    }
                    if let Some(country) = country {
                        s.country = country;
                    }
                },
            )
            .await?;

        if outcome.matched > 0 {
            invalidate::<State>(&self.cache).await;
        }
        Ok(outcome.modified)
    }

    // == Delete ==
    /// Removes the state record only; returns 0 or 1.
    ///
    /// Its cities are removed by
    /// [`GeoRegistry::delete_state`](crate::registry::GeoRegistry::delete_state).
    pub async fn delete(&self, code: &str) -> Result<u64> {
        let deleted = self.states.delete_one(|s| s.code == code).await?;
        if deleted > 0 {
            invalidate::<State>(&self.cache).await;
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::shared_cache;
    use crate::models::NewCountry;

    async fn stores() -> (CountryStore, StateStore) {
        let db = Database::new();
        let cache = shared_cache(60);
        let countries = CountryStore::new(&db, cache.clone());
        countries
            .create(NewCountry::new("US", "United States"))
            .await
            .unwrap();
        (countries, StateStore::new(&db, cache))
    }

    #[tokio::test]
    async fn test_create_stores_canonical_country() {
        let (countries, states) = stores().await;
        let state = states
            .create(NewState::new("NY", "New York", "united states"), &countries)
            .await
            .unwrap();

        assert_eq!(state.country, "United States");
        assert_eq!(
            states.read_by_code("NY").await.unwrap().unwrap().id,
            state.id
        );
    }

    #[tokio::test]
    async fn test_create_missing_country() {
        let (countries, states) = stores().await;
        let doc = NewState {
            code: Some("NY".into()),
            name: Some("New York".into()),
            country: None,
        };

        let err = states.create(doc, &countries).await.unwrap_err();
        assert!(matches!(err, GeoError::Validation(_)));
        assert!(states.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_country() {
        let (countries, states) = stores().await;
        let err = states
            .create(NewState::new("ON", "Ontario", "Canada"), &countries)
            .await
            .unwrap_err();

        assert!(matches!(err, GeoError::Reference(_)));
        assert!(states.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_non_alphabetic_code() {
        let (countries, states) = stores().await;
        let err = states
            .create(NewState::new("N1", "Nowhere", "United States"), &countries)
            .await
            .unwrap_err();

        assert!(matches!(err, GeoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_duplicate_code() {
        let (countries, states) = stores().await;
        states
            .create(NewState::new("NY", "New York", "United States"), &countries)
            .await
            .unwrap();

        let err = states
            .create(NewState::new("NY", "Not York", "United States"), &countries)
            .await
            .unwrap_err();
        assert!(matches!(err, GeoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_create_bulk_skips_invalid() {
        let (countries, states) = stores().await;
        let docs = vec![
            NewState::new("NY", "New York", "United States"),
            NewState::new("TX", "Texas", "United States"),
            NewState::new("ON", "Ontario", "Canada"),
            NewState::new("CA-ON", "Ontario", "United States"),
            NewState {
                code: Some("NJ".into()),
                name: Some("New Jersey".into()),
                country: None,
            },
            NewState::new("NY", "New York again", "United States"),
        ];

        let report = states.create_bulk(docs, &countries).await.unwrap();
        assert_eq!(report.inserted(), 2);
        assert_eq!(report.skipped, 4);
        assert_eq!(states.read_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_bulk_is_idempotent() {
        let (countries, states) = stores().await;
        let docs = vec![
            NewState::new("NY", "New York", "United States"),
            NewState::new("TX", "Texas", "United States"),
        ];

        states.create_bulk(docs.clone(), &countries).await.unwrap();
        let second = states.create_bulk(docs, &countries).await.unwrap();

        assert_eq!(second.inserted(), 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(states.read_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_read_by_country() {
        let (countries, states) = stores().await;
        states
            .create(NewState::new("NY", "New York", "United States"), &countries)
            .await
            .unwrap();

        assert_eq!(states.read_by_country("United States").await.unwrap().len(), 1);
        assert!(states.read_by_country("Canada").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update() {
        let (countries, states) = stores().await;
        states
            .create(NewState::new("NY", "New York", "United States"), &countries)
            .await
            .unwrap();
        states.read_all().await.unwrap();

        let update = StateUpdate {
            name: Some("Empire State".into()),
            country: None,
        };
        assert_eq!(states.update("NY", update.clone(), &countries).await.unwrap(), 1);
        assert_eq!(states.update("NY", update.clone(), &countries).await.unwrap(), 0);
        assert_eq!(states.update("ZZ", update, &countries).await.unwrap(), 0);

        let all = states.read_all().await.unwrap();
        assert_eq!(all[0].name, "Empire State");
    }

    #[tokio::test]
    async fn test_update_to_unknown_country() {
        let (countries, states) = stores().await;
        states
            .create(NewState::new("NY", "New York", "United States"), &countries)
            .await
            .unwrap();

        let update = StateUpdate {
            name: None,
            country: Some("Atlantis".into()),
        };
        let err = states.update("NY", update, &countries).await.unwrap_err();
        assert!(matches!(err, GeoError::Reference(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let (countries, states) = stores().await;
        states
            .create(NewState::new("NY", "New York", "United States"), &countries)
            .await
            .unwrap();

        assert_eq!(states.delete("NY").await.unwrap(), 1);
        assert_eq!(states.delete("NY").await.unwrap(), 0);
        assert!(states.read_all().await.unwrap().is_empty());
    }
}
