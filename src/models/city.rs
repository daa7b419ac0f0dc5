//! City records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::Document;
use crate::error::{GeoError, Result};
use crate::models::validation::{coordinates, optional, population, required};

/// A stored city. Unique by (name, country), compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    /// Canonical name of the owning country
    pub country: String,
    /// Code of the owning state, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    /// Lower-cased (name, country) pair used for duplicate detection.
    pub fn identity(&self) -> (String, String) {
        (self.name.to_lowercase(), self.country.to_lowercase())
    }
}

impl Document for City {
    const COLLECTION: &'static str = "cities";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// City as submitted by a client. Fields outside this set are dropped
/// during deserialisation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl NewCity {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            country: Some(country.into()),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_population(mut self, population: i64) -> Self {
        self.population = Some(population);
        self
    }

    /// Name and country, both required.
    pub fn key(&self) -> Result<(String, String)> {
        Ok((
            required("name", self.name.as_deref())?,
            required("country", self.country.as_deref())?,
        ))
    }

    /// Validates the remaining fields and builds a record owned by `country`.
    pub fn into_record(self, country: &str) -> Result<City> {
        let name = required("name", self.name.as_deref())?;
        let population = population(self.population)?;
        coordinates(self.latitude, self.longitude)?;

        let now = Utc::now();
        Ok(City {
            id: Uuid::now_v7(),
            name,
            country: country.to_string(),
            state: optional(self.state.as_deref()),
            population,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Fields that may be changed on an existing city.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityUpdate {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl CityUpdate {
    pub fn is_empty(&self) -> bool {
        self.state.is_none()
            && self.population.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }

    /// Checks the update before it is applied.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(GeoError::validation("no fields to update"));
        }
        population(self.population)?;
        coordinates(self.latitude, self.longitude)
    }

    /// Merges the present fields into `city`. Call `validate` first.
    pub fn apply(&self, city: &mut City) {
        if let Some(state) = &self.state {
            city.state = optional(Some(state));
        }
        if let Some(p) = self.population {
            city.population = Some(p.max(0) as u64);
        }
        if self.latitude.is_some() {
            city.latitude = self.latitude;
        }
        if self.longitude.is_some() {
            city.longitude = self.longitude;
        }
    }
}
