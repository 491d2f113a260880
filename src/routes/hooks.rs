// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity-provider trigger routes.

use crate::error::{AppError, Result};
use crate::models::signup::SIGNUP_CONFIRMED;
use crate::models::SignupEvent;
use crate::services::SeedOutcome;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Json, Path, State},
    routing::post,
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Hook routes. The path secret stands in for caller authentication.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/hooks/{secret}/post-confirmation", post(post_confirmation))
}

/// Seed the profile of a newly confirmed user and echo the event back.
///
/// The body is only parsed once the path secret matches, and only signup
/// confirmations are read as a typed event. Every other trigger is echoed
/// exactly as received.
async fn post_confirmation(
    State(state): State<Arc<AppState>>,
    Path(secret): Path<String>,
    body: Bytes,
) -> Result<Json<Value>> {
    let matches: bool = secret
        .as_bytes()
        .ct_eq(state.config.hook_path_secret.as_bytes())
        .into();
    if !matches {
        tracing::warn!("Security Alert: signup hook path secret mismatch");
        return Err(AppError::NotFound("Not found".to_string()));
    }

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid signup event: {e}")))?;

    let trigger = payload.get("triggerSource").and_then(Value::as_str);
    if trigger != Some(SIGNUP_CONFIRMED) {
        tracing::debug!(trigger_source = ?trigger, "Passing through non-signup trigger");
        return Ok(Json(payload));
    }

    let event: SignupEvent = serde_json::from_value(payload.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid signup event: {e}")))?;

    if let SeedOutcome::Seeded(profile) = state.signup.handle(&event).await? {
        tracing::debug!(user_id = %profile.user_id, "Signup hook completed");
    }

    Ok(Json(payload))
}
