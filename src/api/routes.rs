//! API Routes
//!
//! Configures the Axum router with all registry endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    bulk_create_cities, bulk_create_states, create_city, create_country, create_state,
    delete_city, delete_country, delete_state, endpoints_handler, get_city, get_city_by_name,
    get_country, get_country_by_code, get_state, health_handler, list_cities, list_countries,
    list_states, stats_handler, update_city, update_state, AppState,
};

/// Every path served by [`create_router`], reported by `GET /endpoints`.
pub const ROUTES: &[&str] = &[
    "/health",
    "/stats",
    "/endpoints",
    "/countries",
    "/countries/code/:code",
    "/countries/name/:name",
    "/states",
    "/states/:code",
    "/cities",
    "/cities/:country/:name",
    "/bulk/states",
    "/bulk/cities",
    "/lookup/cities/:name",
];

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/endpoints", get(endpoints_handler))
        // Countries
        .route("/countries", get(list_countries).post(create_country))
        .route("/countries/code/:code", get(get_country_by_code))
        .route(
            "/countries/name/:name",
            get(get_country).delete(delete_country),
        )
        // States
        .route("/states", get(list_states).post(create_state))
        .route(
            "/states/:code",
            get(get_state).put(update_state).delete(delete_state),
        )
        // Cities
        .route("/cities", get(list_cities).post(create_city))
        .route(
            "/cities/:country/:name",
            get(get_city).put(update_city).delete(delete_city),
        )
        .route("/bulk/states", post(bulk_create_states))
        .route("/bulk/cities", post(bulk_create_cities))
        .route("/lookup/cities/:name", get(get_city_by_name))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GeoRegistry;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::new(GeoRegistry::in_memory(60)))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_country_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/countries")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"code":"gh","name":"Ghana"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_state_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/states/ZZ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_lookup_city_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/lookup/cities/Kumasi")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
