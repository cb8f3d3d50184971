//! Binary entrypoint for the `skew` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    ExitCode::from(skew::run(std::env::args()))
}

/// Diagnostics go to stderr and are off by default; user-facing output
/// stays on stdout. Enable with e.g. `RUST_LOG=skew=debug`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
