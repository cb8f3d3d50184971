//! Typed drift configuration for one task.

use serde::Serialize;

/// The single schema version this build understands.
pub const SUPPORTED_SCHEMA: u32 = 1;

/// Parsed drift configuration for one task. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSpecification {
    /// Schema version of the block (always [`SUPPORTED_SCHEMA`]).
    pub schema: u32,
    /// Globs declaring which files count as spec for this task.
    /// An empty list means no file is ever considered spec.
    pub spec_globs: Vec<String>,
    /// When `true`, code changes without a spec change are flagged.
    pub require_spec_update_when_code_changes: bool,
    /// Globs for paths excluded from drift consideration entirely.
    /// Always includes the store internals, even when not configured.
    pub ignore_globs: Vec<String>,
}
