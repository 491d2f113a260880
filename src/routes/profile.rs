// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes. Every handler acts on the authenticated caller's own record.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Profile;
use crate::routes::{invalid_request_type, validated, MessageResponse};
use crate::services::ProfileFields;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Profile routes (require authentication; applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/profile",
        get(get_profile)
            .post(create_profile)
            .put(update_profile)
            .fallback(invalid_request_type),
    )
}

/// Editable profile fields. The user id never comes from the body.
#[derive(Debug, Deserialize, Validate)]
struct ProfileBody {
    #[validate(length(max = 256))]
    name: Option<String>,
    #[validate(email)]
    email: Option<String>,
}

impl From<ProfileBody> for ProfileFields {
    fn from(body: ProfileBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub profile: Profile,
}

/// Get the caller's profile, or `{}` if none exists yet.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<serde_json::Value>> {
    let body = match state.profiles.get(&user.identity()).await? {
        Some(profile) => serde_json::to_value(profile).map_err(anyhow::Error::from)?,
        None => serde_json::json!({}),
    };
    Ok(Json(body))
}

async fn create_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<ProfileBody>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let body = validated(body)?;
    state.profiles.create(&user.identity(), body.into()).await?;
    Ok(MessageResponse::new("Profile created"))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<ProfileBody>, JsonRejection>,
) -> Result<Json<ProfileUpdatedResponse>> {
    let body = validated(body)?;
    let profile = state.profiles.update(&user.identity(), body.into()).await?;
    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated".to_string(),
        profile,
    }))
}
