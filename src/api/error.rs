//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.
//!
//! Every error body has the shape `{"error": "<message>"}`. Internal
//! failures get a fixed public message; the detail only goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::credentials::IssueError;

/// Message returned to clients when token issuance fails
pub const TOKEN_FAILURE_MESSAGE: &str = "Failed to generate token";

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// Credential issuance failed
    #[error("Credential error: {0}")]
    Credential(#[from] IssueError),

    /// Optional feature is not configured
    #[error("{0}")]
    Unavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Credential(IssueError::Configuration(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            ApiError::Credential(IssueError::Signing(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SIGNING_ERROR")
            }
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }

    /// Message safe to show the client
    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(msg) | ApiError::Unavailable(msg) => msg.clone(),
            ApiError::Credential(_) => TOKEN_FAILURE_MESSAGE.to_string(),
            ApiError::Internal(_) | ApiError::Io(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::SigningError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Credential(IssueError::Configuration("key".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Credential(SigningError::Encode("x".into()).into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Unavailable("off".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_credential_detail_hidden() {
        let issue = IssueError::Configuration("LiveKit API secret not set".into());
        let err = ApiError::Credential(issue);
        assert_eq!(err.public_message(), TOKEN_FAILURE_MESSAGE);
        assert!(err.to_string().contains("LiveKit API secret"));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ApiError::Validation("Missing identity or room parameter".into());
        assert_eq!(err.public_message(), "Missing identity or room parameter");
    }
}
