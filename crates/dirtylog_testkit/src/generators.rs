//! Property-based test generators using proptest.
//!
//! Generates dirty-database logs with many repeated keys, tombstones and
//! garbage lines, plus an oracle for the expected compaction result.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;

/// One line of a generated log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    /// `{"key": .., "val": ..}` with some spacing style.
    Live {
        /// Record key.
        key: String,
        /// Record value.
        val: Value,
        /// Render with spaces after separators.
        spaced: bool,
    },
    /// `{"key": ..}`.
    Tombstone {
        /// Record key.
        key: String,
    },
    /// A line that is not JSON.
    Garbage(String),
}

impl LogEntry {
    /// Renders the entry without a line terminator.
    pub fn to_line(&self) -> String {
        match self {
            Self::Live { key, val, spaced } => {
                let key = Value::String(key.clone());
                if *spaced {
                    format!("{{ \"key\": {key}, \"val\": {val} }}")
                } else {
                    format!("{{\"key\":{key},\"val\":{val}}}")
                }
            }
            Self::Tombstone { key } => format!("{{\"key\":{}}}", Value::String(key.clone())),
            Self::Garbage(text) => text.clone(),
        }
    }

    /// The key carried by the entry, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Live { key, .. } | Self::Tombstone { key } => Some(key),
            Self::Garbage(_) => None,
        }
    }

    /// Returns true for tombstones.
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Self::Tombstone { .. })
    }
}

/// Strategy for keys drawn from a small pool, so duplicates are common.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("pad:[a-d]").expect("Invalid regex"),
        prop::string::string_regex("globalAuthor:a\\.[0-3]").expect("Invalid regex"),
        Just("key with \"quotes\" and \\ slash".to_string()),
        Just("ünïcödé".to_string()),
    ]
}

/// Strategy for record values.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        prop::string::string_regex("[a-zA-Z0-9 /*]{0,24}")
            .expect("Invalid regex")
            .prop_map(Value::from),
        Just(Value::Null),
        (any::<u32>(), any::<bool>()).prop_map(|(head, ok)| json!({"head": head, "ok": ok})),
    ]
}

/// Strategy for lines that are never valid JSON.
pub fn garbage_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z ]{0,16}")
        .expect("Invalid regex")
        .prop_map(|s| format!("#corrupt {s}"))
}

/// Strategy for a single log entry.
pub fn log_entry_strategy() -> impl Strategy<Value = LogEntry> {
    prop_oneof![
        6 => (key_strategy(), value_strategy(), any::<bool>())
            .prop_map(|(key, val, spaced)| LogEntry::Live { key, val, spaced }),
        2 => key_strategy().prop_map(|key| LogEntry::Tombstone { key }),
        1 => garbage_strategy().prop_map(LogEntry::Garbage),
    ]
}

/// Strategy for a whole log.
pub fn log_strategy(max_lines: usize) -> impl Strategy<Value = Vec<LogEntry>> {
    prop::collection::vec(log_entry_strategy(), 0..max_lines)
}

/// Renders a log as file contents, one `\n`-terminated line per entry.
pub fn render_log(entries: &[LogEntry]) -> String {
    let lines: Vec<String> = entries.iter().map(LogEntry::to_line).collect();
    crate::fixtures::join_lines(&lines)
}

/// Expected compaction output lines, in the order of each key's last
/// occurrence.
pub fn expected_compaction(entries: &[LogEntry], remove_tombstones: bool) -> Vec<String> {
    let mut last: HashMap<&str, usize> = HashMap::new();
    for (i, entry) in entries.iter().enumerate() {
        if let Some(key) = entry.key() {
            last.insert(key, i);
        }
    }

    let mut positions: Vec<usize> = last.into_values().collect();
    positions.sort_unstable();
    positions
        .into_iter()
        .filter(|&i| !(remove_tombstones && entries[i].is_tombstone()))
        .map(|i| entries[i].to_line())
        .collect()
}

/// Number of distinct keys in a log.
pub fn distinct_keys(entries: &[LogEntry]) -> usize {
    let mut keys: Vec<&str> = entries.iter().filter_map(LogEntry::key).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}
