//! Error types for compaction and settings parsing.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for compaction operations.
pub type CompactResult<T> = Result<T, CompactError>;

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors that abort a compaction run.
///
/// Problems with individual records are not errors; they are counted as
/// [`crate::SkipReason`]s in the run statistics.
#[derive(Debug, Error)]
pub enum CompactError {
    /// The input log does not exist.
    #[error("input log not found: {}", path.display())]
    InputNotFound {
        /// The missing input path.
        path: PathBuf,
    },

    /// The input path exists but is not a regular file.
    #[error("input log is not a regular file: {}", path.display())]
    InputNotFile {
        /// The offending input path.
        path: PathBuf,
    },

    /// The derived output path already exists.
    #[error("output file already exists: {} (remove it or move it aside first)", path.display())]
    OutputExists {
        /// The existing output path.
        path: PathBuf,
    },

    /// An I/O error while reading the input or writing the output.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl CompactError {
    /// Wraps an I/O error with the path it happened on.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true for errors caused by bad invocation rather than by I/O.
    ///
    /// Callers print usage guidance for these.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InputNotFound { .. } | Self::InputNotFile { .. } | Self::OutputExists { .. }
        )
    }
}

/// Errors that can occur while loading a JSON-with-comments settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file does not exist.
    #[error("settings file not found: {}", path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The settings file could not be read.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A `/*` comment was opened and never closed.
    #[error("unterminated block comment starting on line {line}")]
    UnterminatedComment {
        /// 1-based line where the comment starts.
        line: usize,
    },

    /// The comment-free text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
