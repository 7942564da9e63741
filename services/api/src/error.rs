//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StorageError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Target or referenced entity does not exist
    #[error("Not found")]
    NotFound,

    /// Path exists but does not accept the request method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Body absent, malformed, or not a JSON object
    pub fn not_a_json() -> Self {
        ApiError::BadRequest("Not a JSON".to_string())
    }

    /// Required attribute absent from the body
    pub fn missing(field: &str) -> Self {
        ApiError::BadRequest(format!("Missing {}", field))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Storage(e) => {
                error!("Storage operation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
