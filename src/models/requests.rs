//! Request DTOs for the registry API
//!
//! Query-string parameters. Record bodies are the `New*` / `*Update` types.

use serde::Deserialize;

use crate::error::{GeoError, Result};

/// Default page size for city listings
pub const DEFAULT_PER_PAGE: usize = 50;
/// Largest accepted page size
pub const MAX_PER_PAGE: usize = 500;

/// `GET /countries` parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryQuery {
    /// Case-insensitive name fragment
    pub search: Option<String>,
}

/// `GET /states` parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateQuery {
    /// Exact owning country name
    pub country: Option<String>,
}

/// `GET /cities` parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityQuery {
    /// Exact country name, case-insensitive
    pub country: Option<String>,
    /// Case-insensitive name fragment
    pub name: Option<String>,
    /// Exact state code
    pub state: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl CityQuery {
    /// Returns `(page, per_page)` with defaults applied.
    pub fn pagination(&self) -> Result<(usize, usize)> {
        let page = self.page.unwrap_or(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if page == 0 {
            return Err(GeoError::validation("page starts at 1"));
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(GeoError::validation(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        Ok((page, per_page))
    }
}
