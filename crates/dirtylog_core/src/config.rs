//! Compaction configuration.

use std::fmt;
use std::str::FromStr;

/// Default number of lines between progress ticks.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Default suffix appended to the input path to name the output.
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".new";

/// How retained records are held between the scan and the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Keep every retained line in memory; one read of the input.
    #[default]
    Memory,
    /// Keep only byte offsets; read the input a second time to copy lines.
    TwoPass,
}

impl Strategy {
    /// Returns the command-line name of the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::TwoPass => "two-pass",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "two-pass" | "two_pass" => Ok(Self::TwoPass),
            other => Err(format!(
                "unknown strategy '{other}' (expected 'memory' or 'two-pass')"
            )),
        }
    }
}

/// Configuration for a compaction run.
#[derive(Debug, Clone)]
pub struct CompactConfig {
    /// How retained records are buffered.
    pub strategy: Strategy,

    /// Drop keys whose last record is a tombstone.
    pub remove_tombstones: bool,

    /// Scan and report without writing the output.
    pub dry_run: bool,

    /// Lines between progress ticks (0 = never).
    pub progress_interval: u64,

    /// Suffix appended to the input path to form the output path.
    pub output_suffix: String,
}

impl Default for CompactConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Memory,
            remove_tombstones: false,
            dry_run: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl CompactConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffering strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets whether tombstoned keys are dropped from the output.
    #[must_use]
    pub fn remove_tombstones(mut self, value: bool) -> Self {
        self.remove_tombstones = value;
        self
    }

    /// Sets whether the run stops after the scan.
    #[must_use]
    pub fn dry_run(mut self, value: bool) -> Self {
        self.dry_run = value;
        self
    }

    /// Sets the progress tick interval.
    #[must_use]
    pub fn progress_interval(mut self, lines: u64) -> Self {
        self.progress_interval = lines;
        self
    }

    /// Sets the output suffix.
    #[must_use]
    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }
}
