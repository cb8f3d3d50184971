//! Command dispatch and handlers.

pub mod check;

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;
use crate::error::exit;

/// Dispatch a parsed command to its handler, returning the exit code.
#[must_use]
pub fn dispatch(cli: &Cli) -> u8 {
    match &cli.command {
        Command::Check { tasks, write_log, create_followups } => {
            let ctx = match ServiceContext::live(cli.dir.as_deref()) {
                Ok(ctx) => ctx,
                Err(err) => {
                    eprintln!("{err}");
                    return exit::FAILURE;
                }
            };
            let options = check::CheckOptions {
                write_log: *write_log,
                create_followups: *create_followups,
                json: cli.json,
            };
            check::run_with_context(&ctx, tasks, &options)
        }
    }
}
