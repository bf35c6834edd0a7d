//! API error type and failure envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{DomainError, FieldErrors};

/// Message returned for every server-side failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Failure body: `{success: false, message, errors?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                success: false,
                message: message.into(),
                errors: None,
            },
        }
    }

    /// Attach the per-field validation messages
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.response.errors = Some(errors);
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Internal server error; the cause is logged, never returned
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    /// Validation failure with field details
    pub fn validation(errors: FieldErrors) -> Self {
        Self::bad_request("Validation failed").with_errors(errors)
    }

    /// Map a failed update
    ///
    /// Malformed IDs and uniqueness conflicts are client errors on update and
    /// are reported as an invalid request rather than a 500 or 409.
    pub fn from_update_error(err: DomainError) -> Self {
        match err {
            DomainError::InvalidId { .. } | DomainError::Conflict { .. } => {
                Self::bad_request("Invalid update request")
            }
            other => other.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { errors } => Self::validation(errors),
            DomainError::Conflict { message, .. } => Self::conflict(message),
            err @ (DomainError::InvalidId { .. }
            | DomainError::Configuration { .. }
            | DomainError::Internal { .. }
            | DomainError::Storage { .. }) => Self::internal(err),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.message)
    }
}

impl std::error::Error for ApiError {}
