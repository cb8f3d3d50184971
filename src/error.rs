//! Check error taxonomy and process exit codes.

use thiserror::Error;

use crate::glob::PatternError;
use crate::spec::SpecParseError;

/// Process exit codes for the `skew` binary.
pub mod exit {
    /// Every checked task was clean.
    pub const OK: u8 = 0;
    /// An external collaborator failed (task missing, provider or store error).
    pub const FAILURE: u8 = 1;
    /// Usage error (bad arguments).
    pub const USAGE: u8 = 2;
    /// At least one advisory drift finding.
    pub const FINDINGS: u8 = 3;
    /// Configuration error (drift block or glob pattern).
    pub const CONFIG: u8 = 4;
}

/// Errors that abort a single task's drift check.
///
/// Configuration errors (`SpecParse`, `Pattern`) are never downgraded to
/// a clean verdict, and a collaborator failure is never mistaken for
/// "no changes".
#[derive(Debug, Error)]
pub enum CheckError {
    /// The task's drift block is present but malformed.
    #[error("task {task_id}: invalid drift configuration: {source}")]
    SpecParse {
        /// The task whose block failed to parse.
        task_id: String,
        /// The offending key or value.
        source: SpecParseError,
    },
    /// A configured glob pattern could not be compiled.
    #[error("task {task_id}: {source}")]
    Pattern {
        /// The task whose configuration carries the pattern.
        task_id: String,
        /// The offending pattern.
        source: PatternError,
    },
    /// The task does not exist in the store.
    #[error("task not found: {0}")]
    TaskNotFound(String),
    /// An external collaborator call failed.
    #[error("task {task_id}: {stage} failed: {message}")]
    Collaborator {
        /// The task being checked when the collaborator failed.
        task_id: String,
        /// Which collaborator call failed.
        stage: &'static str,
        /// The collaborator's error text.
        message: String,
    },
}

impl CheckError {
    /// Maps the error to its process exit code.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::SpecParse { .. } | Self::Pattern { .. } => exit::CONFIG,
            Self::TaskNotFound(_) | Self::Collaborator { .. } => exit::FAILURE,
        }
    }
}
