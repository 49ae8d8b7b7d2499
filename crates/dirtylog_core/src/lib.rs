//! # dirtylog core
//!
//! Maintenance routines for dirty-database logs and their settings files.
//!
//! A dirty database is an append-only JSON Lines file: every write appends
//! `{"key": ..., "val": ...}` and every removal appends `{"key": ...}`.
//! The file only grows. [`Compactor`] rewrites it to one line per key,
//! keeping the last line written for each key, byte for byte.
//!
//! The crate also reads the JSON-with-comments settings files that point
//! at such databases (see [`jsonc`] and [`SettingsFile`]).
//!
//! ## Example
//!
//! ```rust
//! use dirtylog_core::LineKind;
//!
//! let kind = LineKind::classify(br#"{"key":"pad:1","val":{"head":3}}"#);
//! assert_eq!(kind.key(), Some("pad:1"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod compactor;
mod config;
mod error;
pub mod jsonc;
mod output;
mod progress;
mod record;
mod scan;
mod settings;
mod table;

pub use compactor::{CompactReport, CompactStats, Compactor};
pub use config::{CompactConfig, Strategy, DEFAULT_OUTPUT_SUFFIX, DEFAULT_PROGRESS_INTERVAL};
pub use error::{CompactError, CompactResult, SettingsError, SettingsResult};
pub use output::{output_path_for, OutputFile};
pub use progress::{DotProgress, NoProgress, Progress};
pub use record::{LineKind, SkipReason, KEY_FIELD, VALUE_FIELD};
pub use scan::{LineScanner, ScannedLine};
pub use settings::{SettingsFile, SettingsSummary, NOT_SET};
pub use table::{CompactionTable, TableEntry};
