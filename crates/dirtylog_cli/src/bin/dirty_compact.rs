//! Compacts a dirty-database log to one line per key.
//!
//! The result is written next to the input as `<log>.new`; the input is
//! never modified.

use clap::{CommandFactory, Parser};
use dirtylog_cli::{commands, exit_on_error, exit_on_parse_error, logging};
use dirtylog_core::{CompactConfig, Strategy};
use std::path::PathBuf;
use std::process::ExitCode;

/// Keep only the last line written for each key of a dirty-database log.
#[derive(Parser)]
#[command(name = "dirty-compact")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the log file; the output is written to <LOG>.new
    log: PathBuf,

    /// Drop keys whose last record is a removal
    #[arg(short, long)]
    remove_tombstones: bool,

    /// Dry run - scan and report without writing
    #[arg(short, long)]
    dry_run: bool,

    /// Buffering strategy (memory, two-pass)
    #[arg(short, long, default_value = "memory")]
    strategy: Strategy,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return exit_on_parse_error(e),
    };

    logging::init(cli.verbose);

    let config = CompactConfig::new()
        .strategy(cli.strategy)
        .remove_tombstones(cli.remove_tombstones)
        .dry_run(cli.dry_run);

    match commands::compact::run(&cli.log, config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let usage = Cli::command().render_usage().to_string();
            exit_on_error(&e, &usage)
        }
    }
}
