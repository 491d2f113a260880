// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post-registration profile seeding.
//!
//! Runs once per confirmed signup and writes the initial profile with a
//! create-only condition. A second seed for the same user is surfaced as
//! access denied so that duplicate triggers show up in alerts and never
//! clobber edits the user already made.

use crate::db::ProfileStore;
use crate::error::{AppError, Result};
use crate::models::{Profile, SignupEvent};
use crate::time_utils::now_rfc3339;
use std::sync::Arc;

/// Result of handling one signup event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Not a signup confirmation; nothing was written.
    Skipped,
    Seeded(Profile),
}

/// Seeds the initial profile for newly confirmed identities.
#[derive(Clone)]
pub struct SignupSeeder {
    store: Arc<dyn ProfileStore>,
}

impl SignupSeeder {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, event: &SignupEvent) -> Result<SeedOutcome> {
        if !event.is_signup_confirmed() {
            tracing::debug!(
                trigger_source = %event.trigger_source,
                "Ignoring non-signup trigger"
            );
            return Ok(SeedOutcome::Skipped);
        }

        let user_id = event.subject().ok_or(AppError::MissingIdentity)?;

        let profile = Profile {
            user_id: user_id.to_string(),
            email: event.email().map(str::to_string),
            name: event.display_name().to_string(),
            created_at: now_rfc3339(),
            updated_at: None,
        };

        match self.store.create_profile(&profile).await {
            Ok(()) => {
                tracing::info!(user_id = %profile.user_id, "Seeded profile for new signup");
                Ok(SeedOutcome::Seeded(profile))
            }
            Err(AppError::ConditionFailed(reason)) => {
                tracing::error!(
                    user_id = %profile.user_id,
                    reason = %reason,
                    "Duplicate profile seed rejected"
                );
                Err(AppError::AccessDenied(format!(
                    "Profile already seeded for user {}",
                    profile.user_id
                )))
            }
            Err(other) => Err(other),
        }
    }
}
