//! Follow-up task decisions with at-most-once semantics.

use std::collections::BTreeSet;

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::evaluate::{Finding, Verdict};

/// How many hex characters of the content hash identify a revision.
const REVISION_LEN: usize = 12;

/// A request to create a remediation task for a drift finding.
///
/// Handed to the task store, which takes ownership of persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowupRequest {
    /// Deterministic id of the follow-up task itself.
    pub task_id: String,
    /// The task whose finding triggered this request.
    pub origin_task: String,
    /// Title of the follow-up task.
    pub title: String,
    /// Why the follow-up exists, including the finding summary.
    pub rationale: String,
}

/// Computes the revision identity of a change set.
///
/// SHA-256 over the sorted, deduplicated path list, so the same unresolved
/// working-tree state hashes identically across reruns regardless of the
/// order the provider reported paths in.
#[must_use]
pub fn revision_for(changes: &[String]) -> String {
    let mut sorted: Vec<&str> = changes.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut hasher = Sha256::new();
    for path in sorted {
        hasher.update(path.as_bytes());
        hasher.update(b"\n");
    }
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(REVISION_LEN);
    digest
}

/// Decides whether a follow-up task should be requested for a finding.
///
/// Returns a request only when the verdict is [`Verdict::AdvisoryDrift`]
/// and no follow-up was already created for this (task, revision) pair, so
/// reruns of the same check on the same unresolved state never
/// double-spawn.
#[must_use]
pub fn decide(
    finding: &Finding,
    origin_title: &str,
    revision: &str,
    prior: &BTreeSet<(String, String)>,
) -> Option<FollowupRequest> {
    if finding.verdict != Verdict::AdvisoryDrift {
        return None;
    }
    if prior.contains(&(finding.task_id.clone(), revision.to_string())) {
        return None;
    }

    let mut rationale = format!(
        "Update the task specs/docs to match current code changes.\n\n\
         Origin task: {}\nFinding: {}\n",
        finding.task_id, finding.reason,
    );
    if !finding.non_spec_touched.is_empty() {
        rationale.push_str("Changed without a spec update:\n");
        for path in &finding.non_spec_touched {
            rationale.push_str("- ");
            rationale.push_str(path);
            rationale.push('\n');
        }
    }

    Some(FollowupRequest {
        task_id: format!("drift-spec-{}", finding.task_id),
        origin_task: finding.task_id.clone(),
        title: format!("spec: {origin_title}"),
        rationale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn finding(verdict: Verdict) -> Finding {
        Finding {
            task_id: "T-1".to_string(),
            verdict,
            non_spec_touched: vec!["src/app.go".to_string()],
            reason: "non-spec files changed but no declared spec file changed".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn revision_is_order_insensitive() {
        let a = revision_for(&strings(&["src/a.rs", "src/b.rs"]));
        let b = revision_for(&strings(&["src/b.rs", "src/a.rs"]));
        assert_eq!(a, b);
    }

    #[test]
    fn revision_is_duplicate_insensitive() {
        let a = revision_for(&strings(&["src/a.rs", "src/a.rs"]));
        let b = revision_for(&strings(&["src/a.rs"]));
        assert_eq!(a, b);
    }

    #[test]
    fn different_change_sets_get_different_revisions() {
        let a = revision_for(&strings(&["src/a.rs"]));
        let b = revision_for(&strings(&["src/b.rs"]));
        assert_ne!(a, b);
        assert_eq!(a.len(), REVISION_LEN);
    }

    #[test]
    fn clean_finding_produces_no_request() {
        let prior = BTreeSet::new();
        assert!(decide(&finding(Verdict::Clean), "Widget work", "abc", &prior).is_none());
    }

    #[test]
    fn drift_finding_produces_a_request() {
        let prior = BTreeSet::new();
        let request = decide(&finding(Verdict::AdvisoryDrift), "Widget work", "abc", &prior)
            .expect("drift should request a follow-up");
        assert_eq!(request.task_id, "drift-spec-T-1");
        assert_eq!(request.origin_task, "T-1");
        assert_eq!(request.title, "spec: Widget work");
        assert!(request.rationale.contains("src/app.go"));
    }

    #[test]
    fn prior_followup_for_same_revision_suppresses_the_request() {
        let mut prior = BTreeSet::new();
        prior.insert(("T-1".to_string(), "abc".to_string()));
        assert!(decide(&finding(Verdict::AdvisoryDrift), "t", "abc", &prior).is_none());
    }

    #[test]
    fn new_revision_requests_again() {
        let mut prior = BTreeSet::new();
        prior.insert(("T-1".to_string(), "abc".to_string()));
        assert!(decide(&finding(Verdict::AdvisoryDrift), "t", "def", &prior).is_some());
    }

    #[test]
    fn sequential_decides_sharing_state_request_once() {
        let mut prior = BTreeSet::new();
        let drift = finding(Verdict::AdvisoryDrift);
        let revision = revision_for(&drift.non_spec_touched);

        let first = decide(&drift, "t", &revision, &prior);
        assert!(first.is_some());
        prior.insert((drift.task_id.clone(), revision.clone()));

        let second = decide(&drift, "t", &revision, &prior);
        assert!(second.is_none());
    }
}
