//! Process-level error types
//!
//! [`Error`] covers startup and middleware failures: configuration loading,
//! key material, token validation and socket I/O. Endpoint failures use
//! [`ApiError`](crate::handlers::ApiError) instead, which knows about the
//! operation being performed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Service-wide error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(Box<jsonwebtoken::errors::Error>),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(Box<axum::http::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Authorization error
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
///
/// `error_code` is always 1 so clients can branch on it the same way they
/// do for success markers.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: u8,

    /// Error message
    pub error: String,

    /// Optional machine-readable code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error_code: 1,
            error: error.into(),
            code: None,
            status: status.as_u16(),
        }
    }

    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::new(status, error)
        }
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Jwt(_) | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Http(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                ErrorResponse::with_code(status, "CONFIG_ERROR", "Service misconfigured")
            }
            Error::Jwt(e) => ErrorResponse::with_code(status, "INVALID_TOKEN", e.to_string()),
            Error::Http(e) => ErrorResponse::with_code(status, "HTTP_ERROR", e.to_string()),
            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                ErrorResponse::with_code(status, "IO_ERROR", "I/O operation failed")
            }
            Error::Unauthorized(msg) => ErrorResponse::with_code(status, "UNAUTHORIZED", msg),
            Error::Forbidden(msg) => ErrorResponse::with_code(status, "FORBIDDEN", msg),
            Error::NotFound(msg) => ErrorResponse::with_code(status, "NOT_FOUND", msg),
            Error::BadRequest(msg) => ErrorResponse::with_code(status, "BAD_REQUEST", msg),
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::with_code(status, "INTERNAL_ERROR", "Internal server error")
            }
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

// Boxed variants keep `Error` small
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Jwt(Box::new(err))
    }
}

impl From<axum::http::Error> for Error {
    fn from(err: axum::http::Error) -> Self {
        Error::Http(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new(StatusCode::NOT_FOUND, "User not found");
        assert_eq!(err.status, 404);
        assert_eq!(err.error_code, 1);
        assert!(err.code.is_none());
    }

    #[test]
    fn test_error_response_with_code() {
        let err = ErrorResponse::with_code(StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "expired");
        assert_eq!(err.status, 401);
        assert_eq!(err.error, "expired");
        assert_eq!(err.code.as_deref(), Some("INVALID_TOKEN"));
        assert_eq!(err.error_code, 1);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::Unauthorized("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::Forbidden("no".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = Error::Internal("secret path /etc/key".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["error_code"], 1);
    }
}
