//! The last-write-wins compaction table.

use std::collections::HashMap;

/// The record currently retained for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry<V> {
    /// Ordinal of the retained line in the input (1-based line number).
    pub seq: u64,
    /// Whether the retained line is a tombstone.
    pub tombstone: bool,
    /// Strategy-specific payload: raw bytes, or a location in the input.
    pub value: V,
}

/// Maps each key to the last line read for it.
///
/// # Invariants
///
/// - At most one entry per key
/// - An entry always holds the input-order-last line seen for its key;
///   recency is input order only, nothing in the record is compared
#[derive(Debug)]
pub struct CompactionTable<V> {
    entries: HashMap<String, TableEntry<V>>,
    replaced: u64,
}

impl<V> Default for CompactionTable<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            replaced: 0,
        }
    }
}

impl<V> CompactionTable<V> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `entry` for `key`, replacing any earlier entry.
    ///
    /// Returns true if an earlier entry was replaced.
    pub fn insert(&mut self, key: String, entry: TableEntry<V>) -> bool {
        let replaced = self.entries.insert(key, entry).is_some();
        if replaced {
            self.replaced += 1;
        }
        replaced
    }

    /// Returns the entry retained for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TableEntry<V>> {
        self.entries.get(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries overwritten by a later line of the same key.
    #[must_use]
    pub fn replaced(&self) -> u64 {
        self.replaced
    }

    /// Number of keys whose retained line is a tombstone.
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.entries.values().filter(|e| e.tombstone).count()
    }

    /// Consumes the table, returning the entries to write in input order.
    ///
    /// Tombstoned keys are left out when `remove_tombstones` is set.
    #[must_use]
    pub fn into_retained(self, remove_tombstones: bool) -> Vec<(String, TableEntry<V>)> {
        let mut retained: Vec<_> = self
            .entries
            .into_iter()
            .filter(|(_, entry)| !(remove_tombstones && entry.tombstone))
            .collect();
        retained.sort_unstable_by_key(|(_, entry)| entry.seq);
        retained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(seq: u64, value: &str) -> TableEntry<String> {
        TableEntry {
            seq,
            tombstone: false,
            value: value.to_string(),
        }
    }

    #[test]
    fn last_write_wins() {
        let mut table = CompactionTable::new();
        assert!(!table.insert("a".into(), entry(1, "a1")));
        assert!(!table.insert("b".into(), entry(2, "b1")));
        assert!(table.insert("a".into(), entry(3, "a2")));

        assert_eq!(table.len(), 2);
        assert_eq!(table.replaced(), 1);
        assert_eq!(table.get("a").unwrap().value, "a2");
        assert_eq!(table.get("b").unwrap().value, "b1");
    }

    #[test]
    fn retained_in_input_order() {
        let mut table = CompactionTable::new();
        table.insert("a".into(), entry(1, "a1"));
        table.insert("b".into(), entry(2, "b1"));
        table.insert("c".into(), entry(3, "c1"));
        table.insert("a".into(), entry(4, "a2"));

        let keys: Vec<_> = table
            .into_retained(false)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
    }

    #[test]
    fn tombstones_removed_on_request() {
        let mut table = CompactionTable::new();
        table.insert("a".into(), entry(1, "a1"));
        table.insert(
            "a".into(),
            TableEntry {
                seq: 2,
                tombstone: true,
                value: "a-".to_string(),
            },
        );
        table.insert("b".into(), entry(3, "b1"));
        assert_eq!(table.tombstones(), 1);

        let kept = table.into_retained(true);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0, "b");
    }

    #[test]
    fn tombstone_then_rewrite_is_live() {
        let mut table = CompactionTable::new();
        table.insert(
            "a".into(),
            TableEntry {
                seq: 1,
                tombstone: true,
                value: "a-".to_string(),
            },
        );
        table.insert("a".into(), entry(2, "a2"));

        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.into_retained(true).len(), 1);
    }
}
