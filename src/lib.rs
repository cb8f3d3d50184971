//! Core library entry for the `skew` CLI.
//!
//! `skew` is an advisory drift-detection sidecar: for a task it reports
//! whether the files the task declares as its spec were updated in step
//! with the code the task touched. It never blocks work; its only
//! blocking mechanism is a non-zero advisory exit code.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod drift;
pub mod error;
pub mod glob;
pub mod ports;
pub mod spec;

use clap::Parser;

/// Run the CLI with the provided arguments, returning the process exit code.
///
/// Clean checks exit 0, advisory drift exits 3, usage errors exit 2,
/// configuration errors exit 4, and collaborator failures exit 1.
pub fn run<I, T>(args: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match cli::Cli::try_parse_from(args) {
        Ok(cli) => commands::dispatch(&cli),
        Err(err) => {
            // clap routes --help/--version to stdout and real errors to
            // stderr on its own.
            let _ = err.print();
            if err.use_stderr() {
                error::exit::USAGE
            } else {
                error::exit::OK
            }
        }
    }
}
