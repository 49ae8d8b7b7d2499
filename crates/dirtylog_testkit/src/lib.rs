//! # dirtylog testkit
//!
//! Test utilities for dirtylog.
//!
//! This crate provides:
//! - Temporary log and settings files with automatic cleanup
//! - Property-based generators for dirty-database logs, with an oracle
//!   computing the expected compaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dirtylog_testkit::prelude::*;
//!
//! #[test]
//! fn compacts() {
//!     let log = TempLog::from_lines(&[r#"{"key":"a","val":1}"#]);
//!     // ... run the compactor on log.path()
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
