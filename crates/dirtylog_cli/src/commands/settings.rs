//! Settings command implementation.

use crate::CliError;
use dirtylog_core::SettingsFile;
use std::path::Path;

/// Runs the settings command.
///
/// Prints the summary fields, or the whole comment-free document when
/// `as_json` is set.
pub fn run(path: &Path, as_json: bool) -> Result<(), CliError> {
    let settings = SettingsFile::load(path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(settings.document())?);
        return Ok(());
    }

    let summary = settings.summary()?;
    println!("Settings from {}", settings.path().display());
    for (label, value) in summary.fields() {
        println!("  {label:<20} {value}");
    }

    Ok(())
}
