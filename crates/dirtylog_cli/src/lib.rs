//! dirtylog CLI
//!
//! Shared pieces of the command-line tools.
//!
//! # Binaries
//!
//! - `dirty-compact` - Compact a dirty-database log to one line per key
//! - `jsonc-settings` - Print the key fields of a JSON-with-comments settings file

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod commands;
mod error;
pub mod logging;

pub use error::CliError;

use clap::error::ErrorKind;
use std::process::ExitCode;

/// Handles a failed argument parse.
///
/// Help and version requests print normally and succeed. Anything else
/// prints the error and usage to stdout and fails with status 1.
pub fn exit_on_parse_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Reports a command failure and maps it to an exit status.
///
/// Usage errors go to stdout followed by `usage`; other errors go to stderr.
pub fn exit_on_error(err: &CliError, usage: &str) -> ExitCode {
    if err.is_usage() {
        println!("Error: {err}");
        println!();
        println!("{usage}");
    } else {
        eprintln!("Error: {err}");
    }
    ExitCode::FAILURE
}
