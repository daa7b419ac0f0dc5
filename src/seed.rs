//! Sample Data
//!
//! Inserts a small set of countries, states and cities so a fresh server
//! has something to serve. Safe to run repeatedly: records that already
//! exist are skipped.

use tracing::info;

use crate::error::{GeoError, Result};
use crate::models::{NewCity, NewCountry, NewState};
use crate::registry::{CascadeReport, GeoRegistry};

const SAMPLE_COUNTRIES: [(&str, &str); 3] =
    [("US", "United States"), ("CA", "Canada"), ("GH", "Ghana")];

const SAMPLE_STATES: [(&str, &str, &str); 3] = [
    ("NY", "New York", "United States"),
    ("ON", "Ontario", "Canada"),
    ("EP", "Eastern Region", "Ghana"),
];

const SAMPLE_CITIES: [(&str, &str, &str, i64); 3] = [
    ("New York City", "United States", "NY", 8_419_000),
    ("Toronto", "Canada", "ON", 2_930_000),
    ("Kumasi", "Ghana", "EP", 2_000_000),
];

/// Seeds the sample records and reports how many were newly inserted.
pub async fn seed_sample_data(registry: &GeoRegistry) -> Result<CascadeReport> {
    let mut report = CascadeReport::default();

    for (code, name) in SAMPLE_COUNTRIES {
        match registry.create_country(NewCountry::new(code, name)).await {
            Ok(_) => report.countries += 1,
            Err(GeoError::Duplicate(_)) => {}
            Err(err) => return Err(err),
        }
    }

    let states = SAMPLE_STATES
        .iter()
        .map(|&(code, name, country)| NewState::new(code, name, country))
        .collect();
    report.states = registry.create_states(states).await?.inserted() as u64;

    let cities = SAMPLE_CITIES
        .iter()
        .map(|&(name, country, state, population)| {
            NewCity::new(name, country)
                .with_state(state)
                .with_population(population)
        })
        .collect();
    report.cities = registry.create_cities(cities).await?.inserted() as u64;

    info!(
        countries = report.countries,
        states = report.states,
        cities = report.cities,
        "Sample data seeded"
    );
    Ok(report)
}
