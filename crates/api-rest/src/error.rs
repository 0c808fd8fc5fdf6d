//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use stash_core::SaveError;
use stash_store::StoreError;
use stash_types::IdError;

/// A request failure, already mapped to its HTTP status.
///
/// Every failure renders as a structured `{success: false, error}` JSON
/// payload. Backend failures are logged here with their full detail and
/// returned to the client as an opaque internal error.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal,
}

impl From<SaveError> for ApiError {
    fn from(err: SaveError) -> Self {
        match &err {
            SaveError::MissingField(_) => ApiError::BadRequest(err.to_string()),
            SaveError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            SaveError::StoreUnavailable(_) | SaveError::RepositoryUnavailable(_) => {
                tracing::error!("save operation failed: {:?}", err);
                ApiError::Internal
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            StoreError::InvalidKey(_) => ApiError::BadRequest(err.to_string()),
            StoreError::InvalidRoot(_) | StoreError::Unavailable(_) => {
                tracing::error!("object read failed: {:?}", err);
                ApiError::Internal
            }
        }
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        ApiError::BadRequest(format!("invalid owner id: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };
        let body = serde_json::json!({
            "success": false,
            "error": message,
        });
        (status, axum::Json(body)).into_response()
    }
}
