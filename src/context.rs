//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::{find_store_dir, FsTaskStore, GitChangeProvider, LiveClock};
use crate::ports::changes::ChangeProvider;
use crate::ports::clock::Clock;
use crate::ports::tasks::TaskStore;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Tests build
/// contexts from in-memory adapters.
pub struct ServiceContext {
    /// Clock for finding timestamps.
    pub clock: Box<dyn Clock>,
    /// Changed-file provider for the task working tree.
    pub changes: Box<dyn ChangeProvider>,
    /// Task store for records, follow-ups, logs, and state.
    pub tasks: Box<dyn TaskStore>,
}

impl ServiceContext {
    /// Creates a live context rooted at the discovered store directory.
    ///
    /// The change provider operates on the store's parent (the project
    /// directory).
    ///
    /// # Errors
    ///
    /// Returns an error string when no store directory can be found.
    pub fn live(dir: Option<&Path>) -> Result<Self, String> {
        let store_dir = find_store_dir(dir).map_err(|e| e.to_string())?;
        let project_dir =
            store_dir.parent().map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);
        Ok(Self {
            clock: Box::new(LiveClock),
            changes: Box::new(GitChangeProvider::new(&project_dir)),
            tasks: Box::new(FsTaskStore::new(&store_dir)),
        })
    }
}
