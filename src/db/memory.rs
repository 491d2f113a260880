// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process record store for local development and tests.
//!
//! Conditional writes hold the per-key map entry while checking and writing,
//! so concurrent writers to one key are serialized without a global lock.

use crate::db::{ProfileStore, TaskStore};
use crate::error::AppError;
use crate::models::{Profile, ProfileChanges, Task};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Memory-backed store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<DashMap<String, Profile>>,
    tasks: Arc<DashMap<String, Task>>,
    operations: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations issued so far (reads and writes).
    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::Relaxed)
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    fn record_operation(&self) {
        self.operations.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.record_operation();
        Ok(self.profiles.get(user_id).map(|p| p.value().clone()))
    }

    async fn create_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.record_operation();
        match self.profiles.entry(profile.user_id.clone()) {
            Entry::Occupied(_) => Err(AppError::ConditionFailed(format!(
                "profile {} already exists",
                profile.user_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(profile.clone());
                Ok(())
            }
        }
    }

    async fn update_profile(
        &self,
        owner: &str,
        changes: &ProfileChanges,
    ) -> Result<Profile, AppError> {
        self.record_operation();
        match self.profiles.get_mut(owner) {
            Some(mut entry) if entry.user_id == owner => {
                changes.apply_to(entry.value_mut());
                Ok(entry.value().clone())
            }
            _ => Err(AppError::ConditionFailed(format!(
                "no profile owned by {owner}"
            ))),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn scan_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.record_operation();
        Ok(self.tasks.iter().map(|t| t.value().clone()).collect())
    }

    async fn create_task(&self, task: &Task) -> Result<(), AppError> {
        self.record_operation();
        match self.tasks.entry(task.id.clone()) {
            Entry::Occupied(_) => Err(AppError::ConditionFailed(format!(
                "task {} already exists",
                task.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(task.clone());
                Ok(())
            }
        }
    }

    async fn replace_task(&self, task: &Task) -> Result<Task, AppError> {
        self.record_operation();
        let mut entry = self
            .tasks
            .get_mut(&task.id)
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task.id)))?;

        entry.name = task.name.clone();
        entry.completed = task.completed;
        Ok(entry.value().clone())
    }

    async fn delete_task(&self, id: &str) -> Result<Option<Task>, AppError> {
        self.record_operation();
        Ok(self.tasks.remove(id).map(|(_, task)| task))
    }
}
