//! Task store port for task records, follow-ups, and check output.

use serde::{Deserialize, Serialize};

use crate::drift::FollowupRequest;

/// A work item stored in the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Freeform description; may embed a fenced drift block.
    #[serde(default)]
    pub description: String,
    /// Current status (e.g. "open", "done").
    #[serde(default = "default_status")]
    pub status: String,
    /// Freeform labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Task IDs this task is blocked by.
    #[serde(default)]
    pub blocked_by: Vec<String>,
}

fn default_status() -> String {
    "open".to_string()
}

/// Manages task records and drift-check side effects.
///
/// The engine only reads records, looks up prior follow-ups, and emits
/// requests; the store owns all persistence.
pub trait TaskStore: Send + Sync {
    /// Loads a task record by id, or `None` if no such task exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the record exists but cannot be read.
    fn load_task(
        &self,
        id: &str,
    ) -> Result<Option<TaskRecord>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if a follow-up was already created for this
    /// (task, revision) pair.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup cannot be performed.
    fn followup_exists(
        &self,
        task_id: &str,
        revision: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Creates the follow-up task and records the (task, revision) pair.
    ///
    /// Must be idempotent: creating an already-recorded pair is a no-op,
    /// preserving the at-most-once invariant under concurrent callers.
    ///
    /// # Errors
    ///
    /// Returns an error when the follow-up cannot be persisted.
    fn create_followup(
        &self,
        request: &FollowupRequest,
        revision: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Appends one line to the task's check log.
    ///
    /// # Errors
    ///
    /// Returns an error when the log cannot be written.
    fn append_log(
        &self,
        task_id: &str,
        line: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Overwrites the last-check state snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be written.
    fn write_state(&self, json: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
