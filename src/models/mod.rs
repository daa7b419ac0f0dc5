//! Records and DTOs
//!
//! Stored record types for the three collections, their client-facing
//! input types, and the HTTP request/response bodies.

pub mod city;
pub mod country;
pub mod requests;
pub mod responses;
pub mod state;
pub mod validation;

// Re-export commonly used types
pub use city::{City, CityUpdate, NewCity};
pub use country::{Country, NewCountry};
pub use requests::{CityQuery, CountryQuery, StateQuery};
pub use responses::{
    BulkInsertResponse, DeleteResponse, EndpointsResponse, HealthResponse, ListResponse,
    PageResponse, StatsResponse, UpdateResponse,
};
pub use state::{NewState, State, StateUpdate};
