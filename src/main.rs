//! Binary entry point for confsql.
//!
//! Thin wrapper over the CLI module: installs the tracing subscriber, then
//! parses and runs the selected command.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
// Allow print_stderr in main binary for CLI error output
#![allow(clippy::print_stderr)]

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match confsql::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
