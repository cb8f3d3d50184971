//! Changed-file provider port.

/// Supplies the set of files changed in a task's working tree.
///
/// Abstracting the provider allows checks to run against fixtures in
/// tests without a real repository.
pub trait ChangeProvider: Send + Sync {
    /// Returns the repo-root-relative paths added, modified, or deleted
    /// since the task's baseline, ordered and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error when the change list cannot be computed. Callers
    /// must treat this as a collaborator failure, never as "no changes".
    fn working_changes(&self) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;
}
