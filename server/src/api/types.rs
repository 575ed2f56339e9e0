//! Shared API types
//!
//! Every error leaving the API is rendered here, as an [`ErrorBody`] or, for
//! not-found, as a bare 404.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::listings::{ListingError, Violation, Violations};

/// Error envelope returned with every 4xx/5xx that carries a body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Error category, e.g. `bad_request`
    #[schema(example = "bad_request")]
    pub error: &'static str,
    /// Machine-readable code, e.g. `VALIDATION_ERROR`
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,
    pub message: String,
    /// Field violations; present only for `VALIDATION_ERROR`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

impl ErrorBody {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: "bad_request",
            code: code.into(),
            message: message.into(),
            violations: None,
        }
    }
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    /// Candidate failed validation
    Validation(Violations),
    /// 404 with no body
    NotFound,
    Internal { message: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ListingError> for ApiError {
    fn from(e: ListingError) -> Self {
        match e {
            ListingError::Validation(violations) => Self::Validation(violations),
            ListingError::NotFound(id) => {
                tracing::debug!(id, "Listing not found");
                Self::NotFound
            }
            ListingError::Persistence(e) => {
                tracing::error!(error = %e, transient = e.is_transient(), "Data error");
                Self::internal("Database operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "bad_request",
                    code: "VALIDATION_ERROR".to_string(),
                    message: violations.to_string(),
                    violations: Some(violations.into_vec()),
                },
            ),
            Self::NotFound => return StatusCode::NOT_FOUND.into_response(),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "internal_error",
                    code: "INTERNAL".to_string(),
                    message,
                    violations: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
