// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every error renders as `{"message": ..., "status_code": ...}` where
//! `message` is a string, or a field -> messages map for validation errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-field validation messages, keyed by input field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    message: ErrorMessage,
    status_code: u16,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ErrorMessage {
    Text(String),
    Fields(FieldErrors),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorMessage::Text("Authentication required".to_string()),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorMessage::Text("Invalid or expired token".to_string()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorMessage::Text(msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorMessage::Text(msg)),
            AppError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorMessage::Fields(errors))
            }
            AppError::EmailTaken => {
                let mut errors = FieldErrors::new();
                errors.insert(
                    "email".to_string(),
                    vec!["The email has already been taken.".to_string()],
                );
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorMessage::Fields(errors))
            }
            AppError::Provider(msg) => {
                tracing::warn!(error = %msg, "Identity provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorMessage::Text("Failed to authenticate with identity provider".to_string()),
                )
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorMessage::Text("Internal server error".to_string()),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorMessage::Text("Internal server error".to_string()),
                )
            }
        };

        let body = ErrorResponse {
            message,
            status_code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
