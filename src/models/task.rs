//! Task model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Task stored in the shared tasks collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Task {
    /// Invocation id of the request that created the task (also used as document ID)
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}
