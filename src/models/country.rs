//! Country records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::Document;
use crate::error::{GeoError, Result};
use crate::models::validation::required;

/// A stored country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    /// Two or three uppercase letters, e.g. "US"
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Country {
    const COLLECTION: &'static str = "countries";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// Country as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCountry {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl NewCountry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            name: Some(name.into()),
        }
    }

    /// Validates the input and builds a fresh record.
    ///
    /// The code is upper-cased and must be 2 or 3 ASCII letters.
    pub fn into_record(self) -> Result<Country> {
        let code = required("code", self.code.as_deref())?.to_ascii_uppercase();
        if !(2..=3).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GeoError::validation(format!(
                "country code '{}' must be 2 or 3 letters",
                code
            )));
        }
        let name = required("name", self.name.as_deref())?;

        let now = Utc::now();
        Ok(Country {
            id: Uuid::now_v7(),
            code,
            name,
            created_at: now,
            updated_at: now,
        })
    }
}
