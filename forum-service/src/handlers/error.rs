//! API error types for handler operations
//!
//! Structured errors for forum endpoints, with HTTP status mapping via
//! `IntoResponse`. Every error body carries `error_code: 1`, the failure
//! marker clients check for. Internal detail (validation messages, store
//! failures) is logged but never echoed back.
//!
//! # Example
//!
//! ```rust
//! use forum_service::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Article", "42");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id, Some("42".to_string()));
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Like,
    Unlike,
}

impl ApiOperation {
    /// Whether the operation writes to the store
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::List | Self::Get)
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Like => write!(f, "like"),
            Self::Unlike => write!(f, "unlike"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Entity was not found
    NotFound,
    /// Identity required but missing or invalid
    Unauthorized,
    /// The actor may not perform the action
    Forbidden,
    /// Validation or store rejection of a write
    MutationFailed,
    /// Internal server error
    InternalError,
    /// Store temporarily unavailable on a read
    ServiceUnavailable,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::MutationFailed => write!(f, "mutation_failed"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::MutationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error code string for this error kind
    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }

    /// Message shown to clients instead of the internal detail
    const fn public_message(&self) -> Option<&'static str> {
        match self {
            Self::MutationFailed => Some("The change could not be saved"),
            Self::InternalError => Some("An internal error occurred"),
            Self::ServiceUnavailable => Some("Service temporarily unavailable"),
            Self::NotFound | Self::Unauthorized | Self::Forbidden => None,
        }
    }
}

/// Structured API error with operation context
///
/// # Example
///
/// ```rust
/// use forum_service::handlers::{ApiError, ApiOperation};
///
/// let error = ApiError::mutation_failed(ApiOperation::Create, "title is required");
/// assert_eq!(error.kind.status_code().as_u16(), 422);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub operation: ApiOperation,
    pub kind: ApiErrorKind,
    /// Detail for logs; replaced by a generic message for server-side kinds
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::NotFound, "Entity not found")
            .with_entity(entity_type, entity_id)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::Unauthorized, message)
    }

    pub fn forbidden(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::Forbidden, message)
    }

    pub fn mutation_failed(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::MutationFailed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::InternalError, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::ServiceUnavailable, message)
    }

    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Transient errors that may succeed on resubmission
    ///
    /// ```rust
    /// use forum_service::handlers::{ApiError, ApiOperation};
    ///
    /// assert!(ApiError::service_unavailable("store offline").is_retriable());
    /// assert!(ApiError::mutation_failed(ApiOperation::Like, "store offline").is_retriable());
    /// assert!(!ApiError::not_found("User", "1").is_retriable());
    /// ```
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            ApiErrorKind::ServiceUnavailable | ApiErrorKind::MutationFailed
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
struct ApiErrorResponse {
    error_code: u8,
    error: String,
    code: String,
    status: u16,
    operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if status.is_server_error() || self.kind == ApiErrorKind::MutationFailed {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                retriable = self.is_retriable(),
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        }

        let error = self
            .kind
            .public_message()
            .map_or(self.message, str::to_string);
        let response = ApiErrorResponse {
            error_code: 1,
            error,
            code: self.kind.error_code(),
            status: status.as_u16(),
            operation: self.operation.to_string(),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::FindById => ApiOperation::Get,
        RepositoryOperation::FindPage | RepositoryOperation::Count => ApiOperation::List,
        RepositoryOperation::Create => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Update,
        RepositoryOperation::Delete => ApiOperation::Delete,
        RepositoryOperation::Like => ApiOperation::Like,
        RepositoryOperation::Unlike => ApiOperation::Unlike,
    }
}

impl ApiError {
    /// Convert a store error raised while serving `operation`
    ///
    /// A lookup that fails inside a write path is classified as part of the
    /// write, so an unavailable store still yields a mutation failure there.
    pub fn during(operation: ApiOperation, err: RepositoryError) -> Self {
        // On write paths every failure except a missing entity is a
        // mutation failure, store unavailability included.
        let kind = match (err.kind, operation.is_mutation()) {
            (RepositoryErrorKind::NotFound, _) => ApiErrorKind::NotFound,
            (_, true) => ApiErrorKind::MutationFailed,
            (RepositoryErrorKind::Unavailable, false) => ApiErrorKind::ServiceUnavailable,
            (
                RepositoryErrorKind::ValidationFailed
                | RepositoryErrorKind::ConstraintViolation
                | RepositoryErrorKind::Other,
                false,
            ) => ApiErrorKind::InternalError,
        };

        Self {
            operation,
            kind,
            message: err.message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);
        Self::during(operation, err)
    }
}
