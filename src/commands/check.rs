//! `skew check` command — the per-task check runner.
//!
//! Orchestrates one task's drift check: load the task record, parse its
//! drift block, obtain the changed-file set, classify, evaluate, log the
//! finding, and finally decide on a follow-up. The finding is always
//! complete and logged before follow-up creation is attempted, so a
//! failed creation can never lose it.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::context::ServiceContext;
use crate::drift::{classify, decide, evaluate, revision_for, Finding, Verdict};
use crate::error::{exit, CheckError};
use crate::spec::{extract_block, parse_spec_block, TaskSpecification};

/// Flags controlling side effects and output of a check run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Append the finding to the task's check log.
    pub write_log: bool,
    /// Create follow-up tasks for drift findings.
    pub create_followups: bool,
    /// Emit structured JSON instead of text.
    pub json: bool,
}

/// Reason reported when a task declares no drift configuration at all.
const REASON_NO_CONFIG: &str = "no drift configuration declared";

/// Change-set counts for the report.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Telemetry {
    /// Total changed files considered.
    pub files_changed: usize,
    /// Changed files matching a declared spec glob.
    pub spec_files_changed: usize,
    /// Changed files matching no spec glob.
    pub non_spec_files_changed: usize,
    /// Changed files excluded by ignore globs.
    pub ignored_files: usize,
}

/// Full report for one task's drift check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// The checked task.
    pub task_id: String,
    /// The task's title.
    pub task_title: String,
    /// The parsed configuration, absent when the task declares none.
    pub spec: Option<TaskSpecification>,
    /// Change-set counts.
    pub telemetry: Telemetry,
    /// The finding for this invocation.
    pub finding: Finding,
    /// Id of the follow-up task created by this invocation, if any.
    pub followup: Option<String>,
}

/// Checks each task in order and prints its report.
///
/// The first configuration or collaborator error aborts the run with that
/// error's exit code; otherwise the exit code is [`exit::FINDINGS`] when
/// any task drifted and [`exit::OK`] when all were clean.
#[must_use]
pub fn run_with_context(ctx: &ServiceContext, tasks: &[String], options: &CheckOptions) -> u8 {
    let mut code = exit::OK;
    for task_id in tasks {
        match check_task(ctx, task_id, options) {
            Ok(report) => {
                emit(&report, options.json);
                if report.finding.verdict == Verdict::AdvisoryDrift {
                    code = exit::FINDINGS;
                }
            }
            Err(err) => {
                eprintln!("{err}");
                return err.exit_code();
            }
        }
    }
    code
}

/// Runs the full check pipeline for one task.
fn check_task(
    ctx: &ServiceContext,
    task_id: &str,
    options: &CheckOptions,
) -> Result<CheckReport, CheckError> {
    let record = ctx
        .tasks
        .load_task(task_id)
        .map_err(|e| collaborator(task_id, "task store", e))?
        .ok_or_else(|| CheckError::TaskNotFound(task_id.to_string()))?;

    let Some(body) = extract_block(&record.description) else {
        debug!(task = task_id, "no drift block; nothing to check");
        return Ok(CheckReport {
            task_id: record.id,
            task_title: record.title,
            spec: None,
            telemetry: Telemetry::default(),
            finding: Finding {
                task_id: task_id.to_string(),
                verdict: Verdict::Clean,
                non_spec_touched: vec![],
                reason: REASON_NO_CONFIG.to_string(),
                timestamp: ctx.clock.now(),
            },
            followup: None,
        });
    };

    let spec = parse_spec_block(&body)
        .map_err(|source| CheckError::SpecParse { task_id: task_id.to_string(), source })?;

    let changes = ctx
        .changes
        .working_changes()
        .map_err(|e| collaborator(task_id, "change provider", e))?;
    debug!(task = task_id, files = changes.len(), "classifying change set");

    let classified = classify(&changes, &spec)
        .map_err(|source| CheckError::Pattern { task_id: task_id.to_string(), source })?;
    let telemetry = Telemetry {
        files_changed: changes.len(),
        spec_files_changed: classified.spec_matches.len(),
        non_spec_files_changed: classified.non_spec_matches.len(),
        ignored_files: classified.ignored.len(),
    };

    let finding = evaluate(&classified, &spec, task_id, ctx.clock.now());
    debug!(task = task_id, verdict = ?finding.verdict, "evaluated drift policy");

    // Log before any follow-up attempt so the finding is never lost.
    if options.write_log {
        ctx.tasks
            .append_log(task_id, &log_line(&finding))
            .map_err(|e| collaborator(task_id, "log writer", e))?;
    }

    let mut followup = None;
    if options.create_followups {
        // Revision identity covers only the considered paths: ignored
        // store internals mutate on every check and must not make the
        // same drift state look new.
        let considered: Vec<String> = classified
            .spec_matches
            .iter()
            .chain(&classified.non_spec_matches)
            .cloned()
            .collect();
        let revision = revision_for(&considered);
        let exists = ctx
            .tasks
            .followup_exists(task_id, &revision)
            .map_err(|e| collaborator(task_id, "follow-up lookup", e))?;
        let mut prior = BTreeSet::new();
        if exists {
            prior.insert((task_id.to_string(), revision.clone()));
        }
        if let Some(request) = decide(&finding, &record.title, &revision, &prior) {
            ctx.tasks
                .create_followup(&request, &revision)
                .map_err(|e| collaborator(task_id, "follow-up creation", e))?;
            followup = Some(request.task_id);
        }
    }

    let report = CheckReport {
        task_id: record.id,
        task_title: record.title,
        spec: Some(spec),
        telemetry,
        finding,
        followup,
    };

    // Best-effort snapshot; never fails a check.
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            if let Err(e) = ctx.tasks.write_state(&json) {
                warn!(task = task_id, "failed to write state snapshot: {e}");
            }
        }
        Err(e) => warn!(task = task_id, "failed to serialize state snapshot: {e}"),
    }

    Ok(report)
}

fn collaborator(
    task_id: &str,
    stage: &'static str,
    error: Box<dyn std::error::Error + Send + Sync>,
) -> CheckError {
    CheckError::Collaborator { task_id: task_id.to_string(), stage, message: error.to_string() }
}

fn log_line(finding: &Finding) -> String {
    match finding.verdict {
        Verdict::Clean => format!("skew: OK ({})", finding.reason),
        Verdict::AdvisoryDrift => {
            format!("skew: drift ({}) | next: update the declared spec paths", finding.reason)
        }
    }
}

fn emit(report: &CheckReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("failed to serialize report: {e}"),
        }
    } else {
        println!("{}", format_report(report));
    }
}

/// Formats a check report as a human-readable block.
#[must_use]
pub fn format_report(report: &CheckReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!("{}: {}", report.task_id, report.task_title));
    match report.finding.verdict {
        Verdict::Clean => {
            lines.push("verdict: clean".to_string());
            lines.push(format!("reason: {}", report.finding.reason));
        }
        Verdict::AdvisoryDrift => {
            lines.push("verdict: drift (advisory)".to_string());
            lines.push(format!("reason: {}", report.finding.reason));
            lines.push("non-spec files changed:".to_string());
            for path in &report.finding.non_spec_touched {
                lines.push(format!("  - {path}"));
            }
            lines.push(
                "advice: update the declared spec paths (or adjust the task's spec globs)"
                    .to_string(),
            );
        }
    }
    if let Some(followup) = &report.followup {
        lines.push(format!("followup: {followup}"));
    }
    lines.join("\n")
}
