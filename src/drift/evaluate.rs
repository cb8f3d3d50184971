//! Drift policy evaluation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classify::ClassifiedChanges;
use crate::spec::TaskSpecification;

/// The outcome of one drift check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No drift: the policy is satisfied (or opted out).
    Clean,
    /// Advisory drift: code changed without a matching spec update.
    AdvisoryDrift,
}

/// Reason reported when the policy flag is off.
pub const REASON_POLICY_DISABLED: &str = "no spec-update policy enabled";
/// Reason reported when nothing changed.
pub const REASON_NO_CHANGES: &str = "no changes";
/// Reason reported when at least one declared spec file changed.
pub const REASON_SPEC_TOUCHED: &str = "spec file touched";
/// Reason reported for an advisory drift finding.
pub const REASON_DRIFT: &str = "non-spec files changed but no declared spec file changed";

/// Structured result of one drift check invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The checked task.
    pub task_id: String,
    /// Clean or advisory drift.
    pub verdict: Verdict,
    /// Changed paths that matched no declared spec glob, in input order.
    pub non_spec_touched: Vec<String>,
    /// Human-readable summary of the verdict.
    pub reason: String,
    /// When the check ran.
    pub timestamp: DateTime<Utc>,
}

/// Applies the drift policy to a classified change set.
///
/// The verdict is `AdvisoryDrift` iff the policy flag is on, at least one
/// non-spec path changed, and no spec path changed. Any spec touch
/// satisfies the requirement for the whole check cycle, and an empty
/// change set is never drift.
#[must_use]
pub fn evaluate(
    classified: &ClassifiedChanges,
    spec: &TaskSpecification,
    task_id: &str,
    timestamp: DateTime<Utc>,
) -> Finding {
    let (verdict, reason) = if !spec.require_spec_update_when_code_changes {
        (Verdict::Clean, REASON_POLICY_DISABLED)
    } else if !classified.non_spec_matches.is_empty() && classified.spec_matches.is_empty() {
        (Verdict::AdvisoryDrift, REASON_DRIFT)
    } else if classified.spec_matches.is_empty() {
        (Verdict::Clean, REASON_NO_CHANGES)
    } else {
        (Verdict::Clean, REASON_SPEC_TOUCHED)
    };

    Finding {
        task_id: task_id.to_string(),
        verdict,
        non_spec_touched: classified.non_spec_matches.clone(),
        reason: reason.to_string(),
        timestamp,
    }
}
