//! Unified error types for the CRM API
//!
//! This module defines error types for each layer:
//! - `ValidationError`: A single field that violates a declared constraint
//! - `DomainError`: Core business logic errors returned by services and repositories
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A field-level constraint violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A uniqueness constraint was violated (`field` is the human label, e.g. "Email")
    #[error("{field} {value} already exists")]
    DuplicateKey { field: &'static str, value: String },

    /// A referenced id does not resolve to an existing row
    #[error("{entity} with ID {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn duplicate_email(email: &str) -> Self {
        DomainError::DuplicateKey {
            field: "Email",
            value: email.to_string(),
        }
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body for JSON responses
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, Option<String>, Option<String>) {
        match self {
            AppError::Domain(DomainError::Validation(e)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(e.message.clone()),
                Some(e.field.to_string()),
            ),
            AppError::Domain(e @ DomainError::DuplicateKey { .. }) => {
                (StatusCode::CONFLICT, "Duplicate key", Some(e.to_string()), None)
            }
            AppError::Domain(e @ DomainError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "Not found", Some(e.to_string()), None)
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()), None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()), None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details, field) = self.parts();

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
            field,
        });

        (status, body).into_response()
    }
}
