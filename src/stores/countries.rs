//! Country Store
//!
//! CRUD over the `countries` collection. Names are unique ignoring case,
//! codes are unique as stored (upper case).

use tracing::{debug, info};

use crate::cache::SharedCache;
use crate::db::{Collection, Database};
use crate::error::{GeoError, Result};
use crate::models::{Country, NewCountry};
use crate::stores::{invalidate, read_all_cached};

#[derive(Debug, Clone)]
pub struct CountryStore {
    countries: Collection<Country>,
    cache: SharedCache,
}

impl CountryStore {
    pub fn new(db: &Database, cache: SharedCache) -> Self {
        Self {
            countries: db.countries.clone(),
            cache,
        }
    }

    // == Create ==
    /// Validates and inserts a country.
    ///
    /// Fails with `Duplicate` when the name (ignoring case) or the code is
    /// already taken.
    pub async fn create(&self, doc: NewCountry) -> Result<Country> {
        let record = doc.into_record()?;

        if self.read_by_name(&record.name).await?.is_some() {
            return Err(GeoError::Duplicate(format!(
                "country '{}' already exists",
                record.name
            )));
        }

        self.countries
            .insert_one(record.clone())
            .await
            .map_err(GeoError::from_insert)?;
        invalidate::<Country>(&self.cache).await;

        info!(code = %record.code, name = %record.name, "Country created");
        Ok(record)
    }

    // == Read ==
    /// Looks up a country by code, ignoring case.
    pub async fn read_by_code(&self, code: &str) -> Result<Option<Country>> {
        let code = code.trim().to_ascii_uppercase();
        Ok(self.countries.find_one(|c| c.code == code).await?)
    }

    /// Looks up a country by exact name, ignoring case.
    pub async fn read_by_name(&self, name: &str) -> Result<Option<Country>> {
        let name = name.trim().to_lowercase();
        Ok(self
            .countries
            .find_one(|c| c.name.to_lowercase() == name)
            .await?)
    }

    /// Every country; served from the listing cache when fresh.
    pub async fn read_all(&self) -> Result<Vec<Country>> {
        read_all_cached(&self.cache, &self.countries).await
    }

    /// Countries whose name contains `fragment`, ignoring case. Never cached.
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Country>> {
        let fragment = fragment.trim().to_lowercase();
        Ok(self
            .countries
            .find(|c| c.name.to_lowercase().contains(&fragment))
            .await?)
    }

    /// Whether a country with this name exists, ignoring case.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.read_by_name(name).await?.is_some())
    }

    /// Returns the named country or a `Reference` error.
    pub async fn resolve(&self, name: &str) -> Result<Country> {
        self.read_by_name(name)
            .await?
            .ok_or_else(|| GeoError::Reference(format!("country '{}' does not exist", name)))
    }

    // == Delete ==
    /// Removes the country record only; returns 0 or 1.
    ///
    /// Dependent states and cities are removed by
    /// [`GeoRegistry::delete_country`](crate::registry::GeoRegistry::delete_country).
    pub async fn delete_by_name(&self, name: &str) -> Result<u64> {
        let name = name.trim().to_lowercase();
        let deleted = self
            .countries
            .delete_one(|c| c.name.to_lowercase() == name)
            .await?;

        if deleted > 0 {
            invalidate::<Country>(&self.cache).await;
        } else {
            debug!(name = %name, "No country to delete");
        }
        Ok(deleted)
    }
}
