//! API Handlers
//!
//! HTTP request handlers. Absence on read/update/delete comes back from the
//! stores as `None`, `0` or `false` and is turned into a 404 here.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::config::Config;
use crate::error::{GeoError, Result};
use crate::models::{
    BulkInsertResponse, City, CityQuery, CityUpdate, Country, CountryQuery, DeleteResponse,
    EndpointsResponse, HealthResponse, ListResponse, NewCity, NewCountry, NewState,
    PageResponse, StateQuery, StateUpdate, StatsResponse, UpdateResponse,
};
use crate::registry::{CascadeReport, GeoRegistry};

use super::extract::{parse_batch, ApiJson};
use super::routes::ROUTES;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: GeoRegistry,
}

impl AppState {
    pub fn new(registry: GeoRegistry) -> Self {
        Self { registry }
    }

    /// Creates an empty in-memory registry using the configured cache TTL.
    pub fn from_config(config: &Config) -> Self {
        Self::new(GeoRegistry::in_memory(config.cache_ttl))
    }
}

// == Countries ==

/// Handler for GET /countries
pub async fn list_countries(
    State(state): State<AppState>,
    Query(query): Query<CountryQuery>,
) -> Result<Json<ListResponse<Country>>> {
    let countries = match query.search.as_deref() {
        Some(fragment) => state.registry.countries.search_by_name(fragment).await?,
        None => state.registry.countries.read_all().await?,
    };
    Ok(Json(ListResponse::new(countries)))
}

/// Handler for POST /countries
pub async fn create_country(
    State(state): State<AppState>,
    ApiJson(doc): ApiJson<NewCountry>,
) -> Result<(StatusCode, Json<Country>)> {
    let country = state.registry.create_country(doc).await?;
    Ok((StatusCode::CREATED, Json(country)))
}

/// Handler for GET /countries/name/:name
pub async fn get_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Country>> {
    state
        .registry
        .countries
        .read_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| GeoError::not_found(format!("country '{}'", name)))
}

/// Handler for GET /countries/code/:code
pub async fn get_country_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Country>> {
    state
        .registry
        .countries
        .read_by_code(&code)
        .await?
        .map(Json)
        .ok_or_else(|| GeoError::not_found(format!("country code '{}'", code)))
}

/// Handler for DELETE /countries/name/:name
///
/// Removes the country with all of its states and their cities.
pub async fn delete_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let report = state.registry.delete_country(&name).await?;
    if report.is_empty() {
        return Err(GeoError::not_found(format!("country '{}'", name)));
    }
    Ok(Json(DeleteResponse::new(name, report)))
}

// == States ==

/// Handler for GET /states
pub async fn list_states(
    State(state): State<AppState>,
    Query(query): Query<StateQuery>,
) -> Result<Json<ListResponse<crate::models::State>>> {
    let states = match query.country.as_deref() {
        Some(country) => state.registry.states.read_by_country(country).await?,
        None => state.registry.states.read_all().await?,
    };
    Ok(Json(ListResponse::new(states)))
}

/// Handler for POST /states
pub async fn create_state(
    State(state): State<AppState>,
    ApiJson(doc): ApiJson<NewState>,
) -> Result<(StatusCode, Json<crate::models::State>)> {
    let created = state.registry.create_state(doc).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for POST /bulk/states
///
/// Entries that do not deserialize are counted as skipped.
pub async fn bulk_create_states(
    State(state): State<AppState>,
    ApiJson(items): ApiJson<Vec<Value>>,
) -> Result<Json<BulkInsertResponse>> {
    let (docs, malformed) = parse_batch::<NewState>(items);
    let mut report = state.registry.create_states(docs).await?;
    report.skipped += malformed;
    Ok(Json(report.into()))
}

/// Handler for GET /states/:code
pub async fn get_state(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<crate::models::State>> {
    state
        .registry
        .states
        .read_by_code(&code)
        .await?
        .map(Json)
        .ok_or_else(|| GeoError::not_found(format!("state '{}'", code)))
}

/// Handler for PUT /states/:code
pub async fn update_state(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiJson(update): ApiJson<StateUpdate>,
) -> Result<Json<UpdateResponse>> {
    let modified = state.registry.update_state(&code, update).await?;
    if modified == 0 && state.registry.states.read_by_code(&code).await?.is_none() {
        return Err(GeoError::not_found(format!("state '{}'", code)));
    }
    Ok(Json(UpdateResponse::new(code, modified)))
}

/// Handler for DELETE /states/:code
///
/// Removes the state and every city that references it.
pub async fn delete_state(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let report = state.registry.delete_state(&code).await?;
    if report.is_empty() {
        return Err(GeoError::not_found(format!("state '{}'", code)));
    }
    Ok(Json(DeleteResponse::new(code, report)))
}

// == Cities ==

/// Handler for GET /cities
///
/// Filters the cached listing by country, name fragment and state, then
/// returns one page.
pub async fn list_cities(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<PageResponse<City>>> {
    let (page, per_page) = query.pagination()?;
    let country = query.country.as_deref().map(str::to_lowercase);
    let fragment = query.name.as_deref().map(str::to_lowercase);

    let matches: Vec<City> = state
        .registry
        .cities
        .read_all()
        .await?
        .into_iter()
        .filter(|c| country.as_ref().map_or(true, |want| c.country.to_lowercase() == *want))
        .filter(|c| {
            fragment
                .as_ref()
                .map_or(true, |want| c.name.to_lowercase().contains(want.as_str()))
        })
        .filter(|c| {
            query
                .state
                .as_ref()
                .map_or(true, |want| c.state.as_ref() == Some(want))
        })
        .collect();

    Ok(Json(PageResponse::paginate(&matches, page, per_page)))
}

/// Handler for POST /cities
pub async fn create_city(
    State(state): State<AppState>,
    ApiJson(doc): ApiJson<NewCity>,
) -> Result<(StatusCode, Json<City>)> {
    let city = state.registry.create_city(doc).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

/// Handler for POST /bulk/cities
///
/// Entries that do not deserialize are counted as skipped.
pub async fn bulk_create_cities(
    State(state): State<AppState>,
    ApiJson(items): ApiJson<Vec<Value>>,
) -> Result<Json<BulkInsertResponse>> {
    let (docs, malformed) = parse_batch::<NewCity>(items);
    let mut report = state.registry.create_cities(docs).await?;
    report.skipped += malformed;
    Ok(Json(report.into()))
}

/// Handler for GET /lookup/cities/:name
pub async fn get_city_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<City>> {
    state
        .registry
        .cities
        .read_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| GeoError::not_found(format!("city '{}'", name)))
}

/// Handler for GET /cities/:country/:name
pub async fn get_city(
    State(state): State<AppState>,
    Path((country, name)): Path<(String, String)>,
) -> Result<Json<City>> {
    state
        .registry
        .cities
        .read_by_name_and_country(&name, &country)
        .await?
        .map(Json)
        .ok_or_else(|| GeoError::not_found(format!("city '{}' in '{}'", name, country)))
}

/// Handler for PUT /cities/:country/:name
pub async fn update_city(
    State(state): State<AppState>,
    Path((country, name)): Path<(String, String)>,
    ApiJson(update): ApiJson<CityUpdate>,
) -> Result<Json<UpdateResponse>> {
    if !state.registry.cities.update(&name, &country, update).await? {
        return Err(GeoError::not_found(format!("city '{}' in '{}'", name, country)));
    }
    Ok(Json(UpdateResponse::new(name, 1)))
}

/// Handler for DELETE /cities/:country/:name
pub async fn delete_city(
    State(state): State<AppState>,
    Path((country, name)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    if !state.registry.cities.delete(&name, &country).await? {
        return Err(GeoError::not_found(format!("city '{}' in '{}'", name, country)));
    }
    let report = CascadeReport {
        cities: 1,
        ..CascadeReport::default()
    };
    Ok(Json(DeleteResponse::new(name, report)))
}

// == Service ==

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.registry.cache().read().await.stats();
    Json(stats.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /endpoints
pub async fn endpoints_handler() -> Json<EndpointsResponse> {
    let mut endpoints: Vec<String> = ROUTES.iter().map(|r| r.to_string()).collect();
    endpoints.sort();
    endpoints.dedup();
    Json(EndpointsResponse { endpoints })
}
