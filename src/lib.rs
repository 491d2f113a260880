// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Taskdesk: profile and task API for a single-page app
//!
//! This crate provides the HTTP backend (profile and task record services,
//! post-registration profile seeding) and a client library for the
//! browser-side view-models.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{ProfileStore, TaskStore};
use services::{IdentityVerifier, ProfileService, SignupSeeder, TaskService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub identity: IdentityVerifier,
    pub profiles: ProfileService,
    pub tasks: TaskService,
    pub signup: SignupSeeder,
}

impl AppState {
    /// Wire services to the given stores. Tests pass a memory store here.
    pub fn new(
        config: Config,
        identity: IdentityVerifier,
        profile_store: Arc<dyn ProfileStore>,
        task_store: Arc<dyn TaskStore>,
    ) -> Self {
        Self {
            config,
            identity,
            profiles: ProfileService::new(profile_store.clone()),
            tasks: TaskService::new(task_store),
            signup: SignupSeeder::new(profile_store),
        }
    }
}
