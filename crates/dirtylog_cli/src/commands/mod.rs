//! CLI command implementations.

pub mod compact;
pub mod settings;
