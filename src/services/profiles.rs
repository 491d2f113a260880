// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile operations scoped to the calling identity.

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::models::{Profile, ProfileChanges};
use crate::services::identity::VerifiedIdentity;
use crate::time_utils::now_rfc3339;
use std::sync::Arc;

/// Fields a caller may supply when creating or updating their profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Profile service. The acting user always comes from the verified token.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// The caller's own profile, if one exists.
    pub async fn get(&self, caller: &VerifiedIdentity) -> Result<Option<Profile>> {
        self.store.get_profile(&caller.user_id).await
    }

    /// Create the caller's profile. A second create for the same user is
    /// rejected instead of overwriting.
    pub async fn create(&self, caller: &VerifiedIdentity, fields: ProfileFields) -> Result<Profile> {
        let now = now_rfc3339();
        let profile = Profile {
            user_id: caller.user_id.clone(),
            email: fields.email.or_else(|| caller.email.clone()),
            name: fields.name.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: Some(now),
        };

        self.store
            .create_profile(&profile)
            .await
            .map_err(|err| match err {
                AppError::ConditionFailed(_) => {
                    AppError::Conflict("Profile already exists".to_string())
                }
                other => other,
            })?;

        tracing::info!(user_id = %profile.user_id, "Profile created");
        Ok(profile)
    }

    /// Update only the supplied fields of the caller's profile and touch
    /// `updatedAt`. Returns the full record after the write.
    pub async fn update(&self, caller: &VerifiedIdentity, fields: ProfileFields) -> Result<Profile> {
        if fields.name.is_none() && fields.email.is_none() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        let changes = ProfileChanges {
            name: fields.name,
            email: fields.email,
            updated_at: now_rfc3339(),
        };

        let profile = self.store.update_profile(&caller.user_id, &changes).await?;

        tracing::info!(
            user_id = %caller.user_id,
            fields = ?changes.field_paths(),
            "Profile updated"
        );
        Ok(profile)
    }
}
