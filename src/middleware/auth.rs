// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity-token authentication middleware.

use crate::error::AppError;
use crate::services::identity::{IdentityError, VerifiedIdentity};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<VerifiedIdentity> for AuthUser {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
        }
    }
}

impl AuthUser {
    pub fn identity(&self) -> VerifiedIdentity {
        VerifiedIdentity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
        }
    }
}

/// Middleware that requires a valid identity token in `Authorization`.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request.headers().get(header::AUTHORIZATION);

    let identity = state
        .identity
        .verify(auth_header)
        .await
        .map_err(|err| match err {
            IdentityError::Missing => AppError::Unauthorized,
            IdentityError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "Rejected identity token");
                AppError::InvalidToken
            }
            IdentityError::Transient(reason) => {
                AppError::Internal(anyhow::anyhow!("identity verification failed: {reason}"))
            }
        })?;

    tracing::debug!(user_id = %identity.user_id, "Authenticated request");

    request.extensions_mut().insert(AuthUser::from(identity));

    Ok(next.run(request).await)
}
