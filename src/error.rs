//! Error types for the entry cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the entry cache and its HTTP surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// An entry with this id is already stored
    #[error("Entry already exists: {0}")]
    DuplicateKey(String),

    /// No entry stored under this id
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// popitem() on a cache without entries
    #[error("Cache is empty")]
    EmptyCache,

    /// The stored value cannot accept the requested update
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// Negative or otherwise malformed time value
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::EmptyCache => StatusCode::NOT_FOUND,
            CacheError::DuplicateKey(_) => StatusCode::CONFLICT,
            CacheError::UnsupportedValueType(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::InvalidTimestamp(_) | CacheError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the entry cache.
pub type Result<T> = std::result::Result<T, CacheError>;
