// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Taskdesk API Server
//!
//! Serves the profile and task record APIs and the signup hook.

use std::sync::Arc;
use taskdesk::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, MemoryStore, ProfileStore, TaskStore},
    services::IdentityVerifier,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        profiles = %config.profiles_collection,
        tasks = %config.tasks_collection,
        "Starting Taskdesk API"
    );

    let (profile_store, task_store): (Arc<dyn ProfileStore>, Arc<dyn TaskStore>) =
        match config.store_backend {
            StoreBackend::Firestore => {
                let db = Arc::new(
                    FirestoreDb::new(
                        &config.gcp_project_id,
                        &config.profiles_collection,
                        &config.tasks_collection,
                    )
                    .await?,
                );
                (db.clone() as Arc<dyn ProfileStore>, db as Arc<dyn TaskStore>)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                let store = Arc::new(MemoryStore::new());
                (store.clone() as Arc<dyn ProfileStore>, store as Arc<dyn TaskStore>)
            }
        };

    let identity = IdentityVerifier::from_config(&config.identity)?;

    let state = Arc::new(AppState::new(
        config.clone(),
        identity,
        profile_store,
        task_store,
    ));

    let app = taskdesk::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("taskdesk=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
