//! API error types and response handling.
//!
//! This module provides a unified error type for all API handlers
//! with automatic conversion to appropriate HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type.
///
/// Each variant maps to a specific HTTP status code and produces a
/// consistent JSON error response.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 400 Bad Request - Invalid input from client.
    BadRequest {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 403 Forbidden - The storage sandbox refused the path.
    Forbidden {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 404 Not Found - Resource does not exist.
    NotFound {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 500 Internal Server Error - Unexpected server-side error.
    InternalError {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
        /// Server-side detail; logged, never sent to the client.
        details: Option<String>,
    },
}

/// Standard JSON error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "invalid_date_format",
    "message": "Invalid date: '2025-13-01'",
    "details": null
}))]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "path_traversal_denied").
    #[schema(example = "invalid_date_format")]
    pub error: String,

    /// Human-readable error message.
    #[schema(example = "Invalid date: '2025-13-01'")]
    pub message: String,

    /// Optional additional details for debugging.
    #[schema(nullable)]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Self::BadRequest {
                error_code,
                message,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::Forbidden {
                error_code,
                message,
            } => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::NotFound {
                error_code,
                message,
            } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::InternalError {
                error_code,
                message,
                details,
            } => {
                // Full detail stays server-side.
                tracing::error!(
                    error_code = %error_code,
                    message = %message,
                    details = ?details,
                    "Internal server error"
                );

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: error_code,
                        message,
                        details: None,
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest { message, .. } => write!(f, "Bad Request: {message}"),
            Self::Forbidden { message, .. } => write!(f, "Forbidden: {message}"),
            Self::NotFound { message, .. } => write!(f, "Not Found: {message}"),
            Self::InternalError { message, .. } => write!(f, "Internal Error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Convert from tutordesk_core errors.
impl From<tutordesk_core::TutordeskError> for ApiError {
    fn from(err: tutordesk_core::TutordeskError) -> Self {
        use tutordesk_core::TutordeskError;

        match &err {
            TutordeskError::InvalidDateFormat(_) => Self::BadRequest {
                error_code: "invalid_date_format".to_string(),
                message: err.to_string(),
            },
            TutordeskError::InvalidWeekday(_) => Self::BadRequest {
                error_code: "invalid_weekday".to_string(),
                message: err.to_string(),
            },
            TutordeskError::InvalidArgument(_) => Self::BadRequest {
                error_code: "invalid_argument".to_string(),
                message: err.to_string(),
            },
            TutordeskError::PathTraversalDenied => Self::Forbidden {
                error_code: "path_traversal_denied".to_string(),
                // Fixed message; resolved paths are never echoed back.
                message: err.to_string(),
            },
            TutordeskError::NotFound(what) => Self::NotFound {
                error_code: "not_found".to_string(),
                message: format!("Not found: {what}"),
            },
            TutordeskError::ConfigNotFound(_)
            | TutordeskError::ConfigParse(_)
            | TutordeskError::Persistence(_)
            | TutordeskError::Io(_) => Self::InternalError {
                error_code: err.error_code().to_ascii_lowercase(),
                message: "An internal error occurred".to_string(),
                details: Some(err.to_string()),
            },
        }
    }
}
