// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides the record store operations for:
//! - Profiles (one document per user id, create-only seeding, owner-conditioned updates)
//! - Tasks (shared collection, scan/create/replace/delete)
//!
//! Conditions travel with the write as Firestore preconditions, so a check
//! and its write can never be interleaved by another request.

use crate::db::{ProfileStore, TaskStore};
use crate::error::AppError;
use crate::models::{Profile, ProfileChanges, Task};
use async_trait::async_trait;
use firestore::errors::FirestoreError;
use firestore::{FirestoreConsistencySelector, FirestoreWritePrecondition};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    profiles_collection: String,
    tasks_collection: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(
        project_id: &str,
        profiles_collection: &str,
        tasks_collection: &str,
    ) -> Result<Self, AppError> {
        let client = if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            Self::create_emulator_client(project_id).await?
        } else {
            let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
                AppError::Database(format!("Failed to connect to Firestore: {}", e))
            })?;
            tracing::info!(project = project_id, "Connected to Firestore");
            client
        };

        Ok(Self {
            client: Some(client),
            profiles_collection: profiles_collection.to_string(),
            tasks_collection: tasks_collection.to_string(),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<firestore::FirestoreDb, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(client)
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            profiles_collection: crate::db::collections::PROFILES.to_string(),
            tasks_collection: crate::db::collections::TASKS.to_string(),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

/// Map a rejected precondition to `on_condition`, everything else to a database error.
fn map_write_error(err: FirestoreError, on_condition: impl FnOnce() -> AppError) -> AppError {
    match err {
        FirestoreError::DataConflictError(_) | FirestoreError::DataNotFoundError(_) => {
            on_condition()
        }
        other => AppError::Database(other.to_string()),
    }
}

#[async_trait]
impl ProfileStore for FirestoreDb {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(&self.profiles_collection)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_profile(&self, profile: &Profile) -> Result<(), AppError> {
        // Insert maps to a create with an implicit "document must not exist" precondition.
        let _: Profile = self
            .get_client()?
            .fluent()
            .insert()
            .into(&self.profiles_collection)
            .document_id(&profile.user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| {
                map_write_error(e, || {
                    AppError::ConditionFailed(format!("profile {} already exists", profile.user_id))
                })
            })?;
        Ok(())
    }

    async fn update_profile(
        &self,
        owner: &str,
        changes: &ProfileChanges,
    ) -> Result<Profile, AppError> {
        // The document id is the owner, so "exists" under this key is the
        // ownership condition.
        self.get_client()?
            .fluent()
            .update()
            .fields(changes.field_paths())
            .in_col(&self.profiles_collection)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(owner)
            .object(changes)
            .execute()
            .await
            .map_err(|e| {
                map_write_error(e, || {
                    AppError::ConditionFailed(format!("no profile owned by {owner}"))
                })
            })
    }
}

#[async_trait]
impl TaskStore for FirestoreDb {
    async fn scan_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(self.tasks_collection.as_str())
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn create_task(&self, task: &Task) -> Result<(), AppError> {
        let _: Task = self
            .get_client()?
            .fluent()
            .insert()
            .into(&self.tasks_collection)
            .document_id(&task.id)
            .object(task)
            .execute()
            .await
            .map_err(|e| {
                map_write_error(e, || {
                    AppError::ConditionFailed(format!("task {} already exists", task.id))
                })
            })?;
        Ok(())
    }

    async fn replace_task(&self, task: &Task) -> Result<Task, AppError> {
        self.get_client()?
            .fluent()
            .update()
            .fields(["name", "completed"])
            .in_col(&self.tasks_collection)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(&task.id)
            .object(task)
            .execute()
            .await
            .map_err(|e| {
                map_write_error(e, || AppError::NotFound(format!("Task {} not found", task.id)))
            })
    }

    /// Read and delete in one transaction so the returned value is the one removed.
    ///
    /// The read goes through the transaction, so a concurrent write to the
    /// same task makes the commit fail instead of returning stale values.
    async fn delete_task(&self, id: &str) -> Result<Option<Task>, AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let existing: Option<Task> = client
            .clone_with_consistency_selector(FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ))
            .fluent()
            .select()
            .by_id_in(&self.tasks_collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_none() {
            let _ = transaction.rollback().await;
            return Ok(None);
        }

        client
            .fluent()
            .delete()
            .from(self.tasks_collection.as_str())
            .document_id(id)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add delete to transaction: {}", e))
            })?;

        match transaction.commit().await {
            Ok(_) => Ok(existing),
            // Another delete won the race; this one removed nothing.
            Err(FirestoreError::DataNotFoundError(_)) => Ok(None),
            Err(e) => Err(AppError::Database(format!(
                "Transaction commit failed: {}",
                e
            ))),
        }
    }
}
