//! Prints the key fields of a JSON-with-comments settings file.

use clap::{CommandFactory, Parser};
use dirtylog_cli::{commands, exit_on_error, exit_on_parse_error, logging};
use std::path::PathBuf;
use std::process::ExitCode;

/// Strip comments from a settings file and print its database settings.
#[derive(Parser)]
#[command(name = "jsonc-settings")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the settings file
    file: PathBuf,

    /// Print the whole comment-free document as JSON
    #[arg(short, long)]
    json: bool,

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

    match commands::settings::run(&cli.file, cli.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let usage = Cli::command().render_usage().to_string();
            exit_on_error(&e, &usage)
        }
    }
}
