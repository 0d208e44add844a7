//! Error types for the cache server
//!
//! The cache itself never fails; these errors belong to the HTTP layer and
//! to configuration loading.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Error type returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache, or stale
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Delete-all on an empty cache
    #[error("No keys found")]
    Empty,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::Empty => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Config Error Enum ==
/// Configuration values that cannot be used.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set but does not parse
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    /// Variable must be positive
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (CacheError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (CacheError::Empty, StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = CacheError::NotFound("missing".to_string()).into_response();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "Key not found: missing");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            name: "MAX_ENTRIES",
            value: "x".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for MAX_ENTRIES: \"x\"");
        assert_eq!(
            ConfigError::Zero("SERVER_PORT").to_string(),
            "SERVER_PORT must be greater than zero"
        );
    }
}
