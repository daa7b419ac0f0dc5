//! State / province records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::Document;
use crate::error::{GeoError, Result};
use crate::models::validation::{is_alphabetic, optional, required};

/// A stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: Uuid,
    /// Letters only, e.g. "NY"
    pub code: String,
    pub name: String,
    /// Canonical name of the owning country
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for State {
    const COLLECTION: &'static str = "states";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// State as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewState {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl NewState {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            name: Some(name.into()),
            country: Some(country.into()),
        }
    }

    /// The referenced country name, which must be present.
    pub fn country_name(&self) -> Result<String> {
        required("country", self.country.as_deref())
    }

    /// Validates code and name and builds a record owned by `country`.
    ///
    /// `country` is the canonical name of an already resolved country.
    pub fn into_record(self, country: &str) -> Result<State> {
        let code = required("code", self.code.as_deref())?;
        if !is_alphabetic(&code) {
            return Err(GeoError::validation(format!(
                "state code '{}' must contain letters only",
                code
            )));
        }
        let name = required("name", self.name.as_deref())?;

        let now = Utc::now();
        Ok(State {
            id: Uuid::now_v7(),
            code,
            name,
            country: country.to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Fields that may be changed on an existing state.
///
/// The code is the state's key and is referenced by cities, so it is not
/// updatable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl StateUpdate {
    pub fn is_empty(&self) -> bool {
        optional(self.name.as_deref()).is_none() && optional(self.country.as_deref()).is_none()
    }
}
