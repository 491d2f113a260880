// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View-models for the profile screen and the task list.
//!
//! The server copy is the source of truth: every successful write is
//! followed by a full re-fetch instead of patching local state.

use crate::client::api::{ApiClient, ProfileInput, ProfileSnapshot};
use crate::models::Task;

/// Locally edited profile fields. `email` is shown read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
}

impl ProfileDraft {
    fn from_snapshot(profile: &ProfileSnapshot) -> Self {
        Self {
            name: profile.name.clone().unwrap_or_default(),
            email: profile.email.clone().unwrap_or_default(),
        }
    }
}

/// Profile screen state.
pub struct ProfileView {
    api: ApiClient,
    profile: ProfileSnapshot,
    draft: ProfileDraft,
    loading: bool,
    saving: bool,
    error: Option<String>,
}

impl ProfileView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            profile: ProfileSnapshot::default(),
            draft: ProfileDraft::default(),
            loading: false,
            saving: false,
            error: None,
        }
    }

    pub fn profile(&self) -> &ProfileSnapshot {
        &self.profile
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Fetch the server copy and reset the draft from it.
    pub async fn load(&mut self) {
        self.loading = true;
        match self.api.get_profile().await {
            Ok(profile) => {
                self.draft = ProfileDraft::from_snapshot(&profile);
                self.profile = profile;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.loading = false;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    /// Whether the draft name differs from the last fetched one.
    pub fn is_dirty(&self) -> bool {
        self.draft.name != self.profile.name.as_deref().unwrap_or("")
    }

    pub fn can_save(&self) -> bool {
        self.is_dirty() && !self.saving && !self.loading && !self.draft.name.trim().is_empty()
    }

    /// Send the trimmed name, then re-fetch. Returns false if nothing was sent.
    pub async fn save(&mut self) -> bool {
        if !self.can_save() {
            return false;
        }

        self.saving = true;
        self.error = None;

        let input = ProfileInput {
            name: Some(self.draft.name.trim().to_string()),
            email: None,
        };

        match self.api.update_profile(&input).await {
            Ok(_) => self.load().await,
            Err(err) => self.error = Some(err.to_string()),
        }

        self.saving = false;
        true
    }

    /// Discard local edits.
    pub fn reset(&mut self) {
        self.draft = ProfileDraft::from_snapshot(&self.profile);
    }
}

/// Task list state.
pub struct TaskBoard {
    api: ApiClient,
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl TaskBoard {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.api.list_tasks().await {
            Ok(tasks) => self.tasks = tasks,
            Err(err) => self.error = Some(err.to_string()),
        }
        self.loading = false;
    }

    pub async fn add(&mut self, name: &str) {
        let result = self.api.create_task(name.trim(), false).await;
        self.after_write(result.map(|_| ())).await;
    }

    /// Flip `completed` on a task from the current list.
    pub async fn toggle(&mut self, id: &str) {
        let Some(task) = self.find(id) else {
            self.error = Some(format!("Unknown task {id}"));
            return;
        };
        let task = Task {
            completed: !task.completed,
            ..task
        };
        let result = self.api.update_task(&task).await;
        self.after_write(result.map(|_| ())).await;
    }

    pub async fn rename(&mut self, id: &str, name: &str) {
        let Some(task) = self.find(id) else {
            self.error = Some(format!("Unknown task {id}"));
            return;
        };
        let task = Task {
            name: name.trim().to_string(),
            ..task
        };
        let result = self.api.update_task(&task).await;
        self.after_write(result.map(|_| ())).await;
    }

    pub async fn remove(&mut self, id: &str) {
        let result = self.api.delete_task(id).await;
        self.after_write(result.map(|_| ())).await;
    }

    fn find(&self, id: &str) -> Option<Task> {
        self.tasks.iter().find(|t| t.id == id).cloned()
    }

    async fn after_write(&mut self, result: Result<(), crate::client::ClientError>) {
        match result {
            Ok(()) => {
                self.error = None;
                self.refresh().await;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}
