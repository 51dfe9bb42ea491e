/// Unified error types for Chirpy
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the server
#[derive(Error, Debug)]
pub enum ChirpError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Bad, missing or expired credentials
    #[error("{0}")]
    Authentication(String),

    /// Caller is known but not allowed to act
    #[error("{0}")]
    Authorization(String),

    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// Not found errors
    #[error("{0}")]
    NotFound(String),

    /// Conflict errors (e.g., duplicate email)
    #[error("{0}")]
    Conflict(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error envelope returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ChirpError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ChirpError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ChirpError::Authorization(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ChirpError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ChirpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ChirpError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ChirpError::Database(_) | ChirpError::Internal(_) => {
                // Don't leak details
                tracing::error!(error = %self, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for server operations
pub type ChirpResult<T> = Result<T, ChirpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (ChirpError::Authentication("no".into()), StatusCode::UNAUTHORIZED),
            (ChirpError::Authorization("no".into()), StatusCode::FORBIDDEN),
            (ChirpError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ChirpError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ChirpError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ChirpError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_internal_detail_not_leaked() {
        let response = ChirpError::Internal("secret stack trace".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Something went wrong");
    }
}
