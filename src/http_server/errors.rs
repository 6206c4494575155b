//! # API Errors
//!
//! The HTTP boundary. Every handler error becomes one of these, and each
//! variant fixes both the status code and the body shape.

use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::AuthError;
use crate::service::{ServiceError, NOT_FOUND};
use crate::validation::FieldErrors;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

pub const INTERNAL_ERROR: &str = "Internal server error.";

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Field-keyed validation failure
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Malformed request
    #[error("{0}")]
    BadRequest(String),

    /// Missing or rejected bearer token on a protected route
    #[error("{0}")]
    Unauthorized(String),

    /// Record, page or route does not exist
    #[error("{0}")]
    NotFound(String),

    /// Duplicate rejected by the store
    #[error("conflict: {0}")]
    Conflict(FieldErrors),

    /// Body is not JSON
    #[error("{0}")]
    UnsupportedMediaType(String),

    // ==================
    // Login Errors
    // ==================
    /// Login endpoint failure, reported as `{"error": ...}`
    #[error("{0}")]
    Auth(AuthError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Unexpected failure; details are logged, never returned
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found() -> Self {
        ApiError::NotFound(NOT_FOUND.to_string())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Auth(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::UNAUTHORIZED)
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            ServiceError::NotFound(message) => ApiError::NotFound(message),
            ServiceError::Conflict(errors) => ApiError::Conflict(errors),
            ServiceError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType(
                "Unsupported media type in request. Expected application/json.".to_string(),
            ),
            other => ApiError::BadRequest(format!("JSON parse error - {}", other.body_text())),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            ApiError::Validation(errors) | ApiError::Conflict(errors) => {
                debug!(status = status.as_u16(), errors = %errors, "Rejected write");
                (status, Json(errors)).into_response()
            }
            ApiError::Auth(e) => {
                if e.is_client_error() {
                    debug!(error = %e, "Login rejected");
                } else {
                    error!(error = %e, "Login failed");
                }
                (status, Json(json!({ "error": e.to_string() }))).into_response()
            }
            ApiError::Unauthorized(message) => (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "detail": message })),
            )
                .into_response(),
            ApiError::Internal(message) => {
                error!(error = %message, "Request failed");
                (status, Json(json!({ "detail": INTERNAL_ERROR }))).into_response()
            }
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::UnsupportedMediaType(message) => {
                (status, Json(json!({ "detail": message }))).into_response()
            }
        }
    }
}
