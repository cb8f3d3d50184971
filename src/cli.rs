//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `skew`.
#[derive(Debug, Parser)]
#[command(name = "skew", version, about = "Advisory drift checks between task specs and code")]
pub struct Cli {
    /// Project directory (or the `.skew` store directory itself).
    /// Defaults to searching upward from the current directory.
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Emit structured JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check tasks for spec drift.
    Check {
        /// Task id to check (repeatable).
        #[arg(long = "task", value_name = "ID", required = true)]
        tasks: Vec<String>,

        /// Append the finding to the task's check log.
        #[arg(long)]
        write_log: bool,

        /// Create follow-up tasks for drift findings.
        #[arg(long)]
        create_followups: bool,
    },
}
