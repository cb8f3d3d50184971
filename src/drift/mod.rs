//! Drift evaluation engine.
//!
//! Given the files changed in a task's working tree and the task's parsed
//! drift configuration, classifies the change set, applies the drift
//! policy to produce a [`Finding`], and decides idempotently whether a
//! follow-up remediation task should be requested.

mod classify;
mod evaluate;
mod followup;

pub use classify::{classify, ClassifiedChanges};
pub use evaluate::{
    evaluate, Finding, Verdict, REASON_DRIFT, REASON_NO_CHANGES, REASON_POLICY_DISABLED,
    REASON_SPEC_TOUCHED,
};
pub use followup::{decide, revision_for, FollowupRequest};
