//! API Error Handling
//!
//! Structured error responses with HTTP status codes and request tracking.

use crate::errors::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

pub const UNCONFIGURED_MESSAGE: &str = "Database is not configured. Set DATABASE_URL.";

/// Top-level API error response with request tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub request_id: String,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code (NOT_FOUND, BAD_REQUEST, CONFLICT, ...)
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error types with request tracking
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    InternalError(String),
    /// No store is wired in
    Unconfigured,
}

impl ApiError {
    fn new(request_id: &str, kind: ApiErrorKind) -> Self {
        Self {
            kind,
            request_id: request_id.to_string(),
        }
    }

    pub fn not_found(request_id: &str, message: impl Into<String>) -> Self {
        Self::new(request_id, ApiErrorKind::NotFound(message.into()))
    }

    pub fn bad_request(request_id: &str, message: impl Into<String>) -> Self {
        Self::new(request_id, ApiErrorKind::BadRequest(message.into()))
    }

    pub fn unauthorized(request_id: &str, message: impl Into<String>) -> Self {
        Self::new(request_id, ApiErrorKind::Unauthorized(message.into()))
    }

    pub fn conflict(request_id: &str, message: impl Into<String>) -> Self {
        Self::new(request_id, ApiErrorKind::Conflict(message.into()))
    }

    pub fn internal_error(request_id: &str, message: impl Into<String>) -> Self {
        Self::new(request_id, ApiErrorKind::InternalError(message.into()))
    }

    pub fn unconfigured(request_id: &str) -> Self {
        Self::new(request_id, ApiErrorKind::Unconfigured)
    }

    /// Log a store failure and report it with a generic message
    pub fn from_store(request_id: &str, context: &str, err: StoreError) -> Self {
        error!(request_id, error = %err, "{}", context);
        Self::internal_error(request_id, context)
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ApiErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            ApiErrorKind::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiErrorKind::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiErrorKind::Conflict(_) => StatusCode::CONFLICT,
            ApiErrorKind::InternalError(_) | ApiErrorKind::Unconfigured => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self.kind {
            ApiErrorKind::NotFound(_) => "NOT_FOUND",
            ApiErrorKind::BadRequest(_) => "BAD_REQUEST",
            ApiErrorKind::Unauthorized(_) => "UNAUTHORIZED",
            ApiErrorKind::Conflict(_) => "CONFLICT",
            ApiErrorKind::InternalError(_) => "INTERNAL_ERROR",
            ApiErrorKind::Unconfigured => "DATABASE_NOT_CONFIGURED",
        }
    }

    pub fn message(&self) -> &str {
        match &self.kind {
            ApiErrorKind::NotFound(msg)
            | ApiErrorKind::BadRequest(msg)
            | ApiErrorKind::Unauthorized(msg)
            | ApiErrorKind::Conflict(msg)
            | ApiErrorKind::InternalError(msg) => msg,
            ApiErrorKind::Unconfigured => UNCONFIGURED_MESSAGE,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.request_id, self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            request_id: self.request_id.clone(),
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.message().to_string(),
                details: None,
            },
        });

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::conflict("r", "taken").status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::unauthorized("r", "no").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::unconfigured("r").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unconfigured_message() {
        let err = ApiError::unconfigured("req-1");
        assert_eq!(err.message(), UNCONFIGURED_MESSAGE);
        assert_eq!(
            err.to_string(),
            "[req-1] DATABASE_NOT_CONFIGURED: Database is not configured. Set DATABASE_URL."
        );
    }

    #[test]
    fn test_store_errors_are_reported_generically() {
        let err = ApiError::from_store("req-2", "Registration failed", StoreError::Pool("refused".into()));
        assert_eq!(err.kind, ApiErrorKind::InternalError("Registration failed".to_string()));
    }
}
