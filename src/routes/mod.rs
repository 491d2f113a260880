// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod hooks;
pub mod profile;
pub mod task;

use crate::error::{AppError, Result};
use crate::middleware::auth::require_auth;
use crate::middleware::{cors, request_id};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Acknowledgement body for writes that return no record.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Fallback for methods a resource does not serve.
pub(crate) async fn invalid_request_type() -> AppError {
    AppError::BadRequest("Invalid request type".to_string())
}

/// Unwrap a JSON body and run its field validation, mapping both failures to 400.
pub(crate) fn validated<T: Validate>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    let Json(value) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    value
        .validate()
        .map_err(|errors| AppError::BadRequest(errors.to_string()))?;
    Ok(value)
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth runs inside CORS so pre-flight requests never need a token.
    let profile_routes = profile::routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(middleware::from_fn(cors::profile_cors));

    let task_routes = task::routes().layer(middleware::from_fn(cors::task_cors));

    Router::new()
        .route("/health", get(health_check))
        .merge(profile_routes)
        .merge(task_routes)
        .merge(hooks::routes())
        .layer(middleware::from_fn(request_id::assign_invocation_id))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
