//! Application error handling
//!
//! Every handler returns [`ApiResult`]; `ApiError` owns the mapping from
//! failure kinds to status codes and the `{"error": {...}}` body.

use crate::auth::AuthError;
use crate::db::{is_unique_violation, is_unique_violation_any};
use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;
use wellness_tracker_shared::{ErrorDetail, ErrorResponse, FieldError};

/// Message returned for every rejected bearer token
pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Validation failure without a specific field
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// The generic bearer-token rejection
    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
    }

    fn parts(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            ApiError::Validation { message, field } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message.clone(),
                field.clone(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }
            ApiError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "Token has expired".to_string(),
                None,
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Incorrect email or password".to_string(),
                None,
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None),
            ApiError::Internal(err) if is_unique_violation_any(err) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Resource already exists".to_string(),
                None,
            ),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::Database(err) if is_unique_violation(err) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Resource already exists".to_string(),
                None,
            ),
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = self.parts();

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        let mut response = (status, body).into_response();
        if matches!(self, ApiError::Unauthorized(_) | ApiError::TokenExpired) {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::Validation {
            message: err.message,
            field: Some(err.field),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let first = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                (field.to_string(), message)
            });

        match first {
            Some((field, message)) => ApiError::Validation {
                message,
                field: Some(field),
            },
            None => ApiError::validation("Invalid request"),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail => ApiError::Conflict("Email already registered".to_string()),
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Unauthenticated => ApiError::unauthenticated(),
            AuthError::TokenExpired => ApiError::TokenExpired,
            AuthError::Validation(field) => field.into(),
            AuthError::Internal(err) => ApiError::Internal(err),
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
