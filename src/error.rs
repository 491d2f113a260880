// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned when a profile update condition is rejected.
pub const PROFILE_CONDITION_MESSAGE: &str = "Profile does not exist or you don't own it.";

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    /// Signup event without a subject attribute.
    #[error("No sub in userAttributes")]
    MissingIdentity,

    /// A conditional write was rejected by the store.
    #[error("Condition failed: {0}")]
    ConditionFailed(String),

    /// A duplicate seed attempt, surfaced distinctly from a raw condition failure.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::MissingIdentity | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ConditionFailed(_) | AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Unauthorized | AppError::InvalidToken => "Unauthorized".to_string(),
            AppError::ConditionFailed(_) => PROFILE_CONDITION_MESSAGE.to_string(),
            AppError::AccessDenied(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg) => msg.clone(),
            AppError::MissingIdentity => self.to_string(),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                msg.clone()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                err.to_string()
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
