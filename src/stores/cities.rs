//! City Store
//!
//! CRUD over the `cities` collection. A city belongs to an existing
//! country, may name a state code, and is unique by (name, country).

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::cache::SharedCache;
use crate::db::{Collection, Database};
use crate::error::{GeoError, Result};
use crate::models::{City, CityUpdate, NewCity};
use crate::stores::{invalidate, read_all_cached, BulkInsertReport, CountryResolver, CountryStore};

#[derive(Debug, Clone)]
pub struct CityStore {
    cities: Collection<City>,
    cache: SharedCache,
}

impl CityStore {
    pub fn new(db: &Database, cache: SharedCache) -> Self {
        Self {
            cities: db.cities.clone(),
            cache,
        }
    }

    // == Create ==
    /// Validates and inserts a city.
    ///
    /// Fails with `Validation` for a missing name/country or a negative
    /// population, `Reference` for an unknown country and `Duplicate` when
    /// the (name, country) pair is taken.
    pub async fn create(&self, doc: NewCity, countries: &CountryStore) -> Result<City> {
        let (_, country) = doc.key()?;
        let country = countries.resolve(&country).await?;
        let record = doc.into_record(&country.name)?;

        let identity = record.identity();
        let existing = self.cities.find_one(|c| c.identity() == identity).await?;
        if existing.is_some() {
            return Err(GeoError::Duplicate(format!(
                "city '{}' already exists in '{}'",
                record.name, record.country
            )));
        }

        self.cities
            .insert_one(record.clone())
            .await
            .map_err(GeoError::from_insert)?;
        invalidate::<City>(&self.cache).await;

        info!(name = %record.name, country = %record.country, "City created");
        Ok(record)
    }

    /// Inserts the valid, new documents of `docs` in one batch.
    ///
    /// Invalid documents, documents repeating an earlier (name, country) in
    /// the batch, and cities already stored are skipped. Batch entries the
    /// store itself rejects are counted as skipped too, so running the same
    /// input twice leaves the collection unchanged the second time.
    pub async fn create_bulk(
        &self,
        docs: Vec<NewCity>,
        countries: &CountryStore,
    ) -> Result<BulkInsertReport> {
        let mut resolver = CountryResolver::new(countries);
        let mut report = BulkInsertReport::default();
        let mut seen: HashSet<(String, String)> = self
            .cities
            .all()
            .await?
            .iter()
            .map(City::identity)
            .collect();
        let mut batch = Vec::with_capacity(docs.len());

        for doc in docs {
            let country = match doc.key() {
                Ok((_, country)) => country,
                Err(err) => {
                    debug!(error = %err, "Skipping city");
                    report.skipped += 1;
                    continue;
                }
            };
            let canonical = match resolver.canonical(&country).await {
                Ok(name) => name,
                Err(GeoError::Reference(msg)) => {
                    debug!(reason = %msg, "Skipping city");
                    report.skipped += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };
            let record = match doc.into_record(&canonical) {
                Ok(record) => record,
                Err(err) => {
                    debug!(error = %err, "Skipping city");
                    report.skipped += 1;
                    continue;
                }
            };
            if !seen.insert(record.identity()) {
                report.skipped += 1;
                continue;
            }
            batch.push(record);
        }

        if batch.is_empty() {
            return Ok(report);
        }

        let outcome = self.cities.insert_many(batch).await?;
        if !outcome.failures.is_empty() {
            warn!(
                failed = outcome.failures.len(),
                "Bulk city insert partially rejected by the store"
            );
        }
        report.skipped += outcome.failures.len();
        report.ids = outcome.inserted_ids;

        if report.inserted() > 0 {
            invalidate::<City>(&self.cache).await;
        }
        info!(
            inserted = report.inserted(),
            skipped = report.skipped,
            "Bulk city insert finished"
        );
        Ok(report)
    }

    // == Read ==
    /// First city with exactly this name, in any country.
    pub async fn read_by_name(&self, name: &str) -> Result<Option<City>> {
        Ok(self.cities.find_one(|c| c.name == name).await?)
    }

    pub async fn read_by_name_and_country(&self, name: &str, country: &str) -> Result<Option<City>> {
        Ok(self
            .cities
            .find_one(|c| c.name == name && c.country == country)
            .await?)
    }

    /// Every city; served from the listing cache when fresh.
    pub async fn read_all(&self) -> Result<Vec<City>> {
        read_all_cached(&self.cache, &self.cities).await
    }

    // == Update ==
    /// Merges `update` into the matching city; returns whether one matched.
    pub async fn update(&self, name: &str, country: &str, update: CityUpdate) -> Result<bool> {
        update.validate()?;

        let outcome = self
            .cities
            .update_one(
                |c| c.name == name && c.country == country,
                move |c| update.apply(c),
            )
            .await?;

        if outcome.matched > 0 {
            invalidate::<City>(&self.cache).await;
        }
        Ok(outcome.matched > 0)
    }

    // == Delete ==
    /// Removes the matching city; returns whether one was deleted.
    pub async fn delete(&self, name: &str, country: &str) -> Result<bool> {
        let deleted = self
            .cities
            .delete_one(|c| c.name == name && c.country == country)
            .await?;
        if deleted > 0 {
            invalidate::<City>(&self.cache).await;
        }
        Ok(deleted > 0)
    }

    /// Removes every city whose `state` is `state_code`; returns how many.
    pub async fn delete_by_state(&self, state_code: &str) -> Result<u64> {
        let deleted = self
            .cities
            .delete_many(|c| c.state.as_deref() == Some(state_code))
            .await?;
        if deleted > 0 {
            invalidate::<City>(&self.cache).await;
        }
        Ok(deleted)
    }

    /// Removes every city of `country` (exact canonical name), with or
    /// without a state; returns how many.
    pub async fn delete_by_country(&self, country: &str) -> Result<u64> {
        let deleted = self.cities.delete_many(|c| c.country == country).await?;
        if deleted > 0 {
            invalidate::<City>(&self.cache).await;
        }
        Ok(deleted)
    }
}
