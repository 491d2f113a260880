//! Storage layer: record store traits with Firestore and in-memory backends.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Profile, ProfileChanges, Task};
use async_trait::async_trait;

/// Default collection names.
pub mod collections {
    pub const PROFILES: &str = "profiles";
    pub const TASKS: &str = "tasks";
}

/// Profile persistence. Writes are conditional; a rejected condition is
/// reported as [`AppError::ConditionFailed`].
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get a profile by user id.
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError>;

    /// Write a new profile, only if no record exists for its user id.
    async fn create_profile(&self, profile: &Profile) -> Result<(), AppError>;

    /// Apply `changes` to the record keyed by `owner`, only if that record
    /// exists and its `userId` equals `owner`. Returns the full record after
    /// the write.
    async fn update_profile(
        &self,
        owner: &str,
        changes: &ProfileChanges,
    ) -> Result<Profile, AppError>;
}

/// Task persistence over a single shared collection.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Every stored task, unordered.
    async fn scan_tasks(&self) -> Result<Vec<Task>, AppError>;

    /// Write a new task, only if its id is unused.
    async fn create_task(&self, task: &Task) -> Result<(), AppError>;

    /// Replace `name` and `completed` of an existing task.
    /// Fails with [`AppError::NotFound`] if the id does not exist.
    async fn replace_task(&self, task: &Task) -> Result<Task, AppError>;

    /// Delete a task, returning its prior value if it existed.
    async fn delete_task(&self, id: &str) -> Result<Option<Task>, AppError>;
}
