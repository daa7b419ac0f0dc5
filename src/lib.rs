//! Geo Registry - a CRUD backend for countries, states and cities
//!
//! Enforces that states and cities reference existing countries, cascades
//! deletes from countries to states to cities, and serves full listings from
//! a TTL cache that every write invalidates.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod registry;
pub mod seed;
pub mod stores;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{GeoError, Result, StorageError};
pub use registry::{CascadeReport, GeoRegistry};
pub use seed::seed_sample_data;
pub use tasks::spawn_cleanup_task;
