//! API Module
//!
//! HTTP handlers and routing for the registry REST API. See
//! [`routes::ROUTES`] for the served paths.

pub mod extract;
pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
