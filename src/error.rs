//! Error types for the geographic registry
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Storage Error Enum ==
/// Failures reported by the document store itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The store is not accepting requests
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A write would break a unique index
    #[error("Duplicate key in {collection}.{index}: {key}")]
    DuplicateKey {
        collection: &'static str,
        index: &'static str,
        key: String,
    },
}

// == Geo Error Enum ==
/// Unified error type for store operations and the HTTP layer.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Required field missing or malformed value
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced parent record does not exist
    #[error("Unknown reference: {0}")]
    Reference(String),

    /// Uniqueness constraint violated
    #[error("Already exists: {0}")]
    Duplicate(String),

    /// Targeted record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Underlying storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GeoError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GeoError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        GeoError::NotFound(msg.into())
    }

    /// Maps a unique-index violation on insert into a domain duplicate.
    pub(crate) fn from_insert(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateKey { key, .. } => GeoError::Duplicate(key),
            other => GeoError::Storage(other),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GeoError {
    fn into_response(self) -> Response {
        let status = match &self {
            GeoError::Validation(_) | GeoError::Reference(_) => StatusCode::BAD_REQUEST,
            GeoError::Duplicate(_) => StatusCode::CONFLICT,
            GeoError::NotFound(_) => StatusCode::NOT_FOUND,
            GeoError::Storage(StorageError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            GeoError::Storage(StorageError::DuplicateKey { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the registry.
pub type Result<T> = std::result::Result<T, GeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GeoError::validation("bad"), StatusCode::BAD_REQUEST),
            (GeoError::Reference("x".into()), StatusCode::BAD_REQUEST),
            (GeoError::Duplicate("x".into()), StatusCode::CONFLICT),
            (GeoError::not_found("x"), StatusCode::NOT_FOUND),
            (
                GeoError::Storage(StorageError::Unavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_from_insert_maps_duplicate_key() {
        let err = GeoError::from_insert(StorageError::DuplicateKey {
            collection: "cities",
            index: "name_country",
            key: "austin|united states".into(),
        });
        assert!(matches!(err, GeoError::Duplicate(_)));

        let err = GeoError::from_insert(StorageError::Unavailable("down".into()));
        assert!(matches!(err, GeoError::Storage(_)));
    }
}
