//! CLI error type.

use dirtylog_core::{CompactError, SettingsError};
use thiserror::Error;

/// Errors reported by the command-line tools.
#[derive(Debug, Error)]
pub enum CliError {
    /// Compaction failed.
    #[error(transparent)]
    Compact(#[from] CompactError),

    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Output could not be rendered.
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Returns true for errors caused by how the tool was invoked.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        match self {
            Self::Compact(e) => e.is_precondition(),
            Self::Settings(SettingsError::NotFound { .. }) => true,
            _ => false,
        }
    }
}
