// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task operations over the shared task collection.
//!
//! Tasks are not partitioned by owner: every caller sees and edits the same list.

use crate::db::TaskStore;
use crate::error::{AppError, Result};
use crate::models::Task;
use std::sync::Arc;

/// Task service.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Task>> {
        self.store.scan_tasks().await
    }

    /// Create a task whose id is the invocation id of the creating request.
    pub async fn create(
        &self,
        invocation_id: &str,
        name: &str,
        completed: Option<bool>,
    ) -> Result<Task> {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Task name is required".to_string()));
        }

        let task = Task {
            id: invocation_id.to_string(),
            name: name.to_string(),
            completed: completed.unwrap_or(false),
        };

        self.store
            .create_task(&task)
            .await
            .map_err(|err| match err {
                AppError::ConditionFailed(_) => {
                    AppError::Conflict(format!("Task {} already exists", task.id))
                }
                other => other,
            })?;

        tracing::info!(task_id = %task.id, "Task created");
        Ok(task)
    }

    /// Replace `name` and `completed` of an existing task.
    pub async fn update(&self, task: Task) -> Result<Task> {
        let updated = self.store.replace_task(&task).await?;
        tracing::info!(task_id = %updated.id, completed = updated.completed, "Task updated");
        Ok(updated)
    }

    /// Delete a task. Deleting an unknown id is not an error.
    pub async fn delete(&self, id: &str) -> Result<Option<Task>> {
        let deleted = self.store.delete_task(id).await?;
        tracing::info!(task_id = %id, existed = deleted.is_some(), "Task deleted");
        Ok(deleted)
    }
}
