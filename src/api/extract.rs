//! Request Extractors
//!
//! JSON body extraction that reports malformed input as a validation error
//! with the usual `{"error": ..}` body instead of axum's plain-text 422.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::GeoError;

/// JSON body extractor whose rejection is a [`GeoError::Validation`].
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GeoError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_error(rejection)),
        }
    }
}

fn rejection_error(rejection: JsonRejection) -> GeoError {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => {
            format!("Invalid JSON syntax: {}", err.body_text())
        }
        JsonRejection::MissingJsonContentType(err) => {
            format!("Missing JSON content type: {}", err.body_text())
        }
        _ => "Failed to parse JSON body".to_string(),
    };
    GeoError::Validation(message)
}

/// Converts each element of a batch on its own.
///
/// Returns the documents that deserialized and the number that did not,
/// so one malformed entry does not reject the whole batch.
pub fn parse_batch<T: DeserializeOwned>(items: Vec<Value>) -> (Vec<T>, usize) {
    let mut docs = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(doc) => docs.push(doc),
            Err(err) => {
                debug!(index, error = %err, "Skipping malformed batch entry");
                skipped += 1;
            }
        }
    }

    (docs, skipped)
}
