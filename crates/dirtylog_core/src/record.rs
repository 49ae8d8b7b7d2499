//! Classification of individual log lines.
//!
//! A dirty-database log stores one JSON object per line. A write appends
//! `{"key": ..., "val": ...}`; a removal appends `{"key": ...}` with no
//! `val`. Anything else is skipped by the compactor.

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::error::Category;
use std::fmt;

/// Field carrying the record key.
pub const KEY_FIELD: &str = "key";

/// Field carrying the record value. Its absence marks a tombstone.
pub const VALUE_FIELD: &str = "val";

/// Why a line was left out of the compaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The line is not valid JSON (blank and non-UTF-8 lines included).
    InvalidJson,
    /// Valid JSON, but not an object with a `key` field.
    MissingKey,
    /// The `key` field is present but is not a string.
    NonStringKey,
}

impl SkipReason {
    /// Short human-readable description.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidJson => "invalid JSON",
            Self::MissingKey => "missing key",
            Self::NonStringKey => "non-string key",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of classifying one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A keyed record with a value.
    Live {
        /// The record key.
        key: String,
    },
    /// A keyed record without a value.
    Tombstone {
        /// The record key.
        key: String,
    },
    /// A line that does not enter the table.
    Skipped(SkipReason),
}

impl LineKind {
    /// Classifies a raw line, trailing newline included.
    ///
    /// Only the `key` and `val` fields are inspected; the rest of the
    /// object is validated and skipped without building a value tree, so
    /// payloads cost no allocation and have no nesting limit.
    #[must_use]
    pub fn classify(line: &[u8]) -> Self {
        let fields = match read_fields::<RecordFields>(line) {
            Ok(fields) => fields,
            // well-formed JSON of the wrong shape, e.g. an array or a number
            Err(e) if e.classify() == Category::Data && read_fields::<IgnoredAny>(line).is_ok() => {
                return Self::Skipped(SkipReason::MissingKey)
            }
            Err(_) => return Self::Skipped(SkipReason::InvalidJson),
        };

        match fields.key {
            Some(KeyField::String(key)) if fields.has_value => Self::Live { key },
            Some(KeyField::String(key)) => Self::Tombstone { key },
            Some(KeyField::Other) => Self::Skipped(SkipReason::NonStringKey),
            None => Self::Skipped(SkipReason::MissingKey),
        }
    }

    /// Returns the key for live and tombstone records.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Live { key } | Self::Tombstone { key } => Some(key),
            Self::Skipped(_) => None,
        }
    }
}

/// Parses a whole line with no recursion limit, growing the stack as needed.
fn read_fields<T: for<'de> Deserialize<'de>>(line: &[u8]) -> serde_json::Result<T> {
    let mut json = serde_json::Deserializer::from_slice(line);
    json.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(value)
}

/// The two top-level fields the compactor reads.
struct RecordFields {
    key: Option<KeyField>,
    has_value: bool,
}

impl<'de> Deserialize<'de> for RecordFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = RecordFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RecordFields, A::Error> {
                let mut fields = RecordFields {
                    key: None,
                    has_value: false,
                };
                // a repeated field keeps its last occurrence
                while let Some(name) = map.next_key::<String>()? {
                    match name.as_str() {
                        KEY_FIELD => fields.key = Some(map.next_value()?),
                        VALUE_FIELD => {
                            map.next_value::<IgnoredAny>()?;
                            fields.has_value = true;
                        }
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// The `key` field: a string, or anything else (skipped unparsed).
enum KeyField {
    String(String),
    Other,
}

impl<'de> Deserialize<'de> for KeyField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = KeyField;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("any JSON value")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<KeyField, E> {
                Ok(KeyField::String(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<KeyField, E> {
                Ok(KeyField::String(v))
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> Result<KeyField, E> {
                Ok(KeyField::Other)
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> Result<KeyField, E> {
                Ok(KeyField::Other)
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<KeyField, E> {
                Ok(KeyField::Other)
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<KeyField, E> {
                Ok(KeyField::Other)
            }

            fn visit_unit<E: de::Error>(self) -> Result<KeyField, E> {
                Ok(KeyField::Other)
            }

            fn visit_none<E: de::Error>(self) -> Result<KeyField, E> {
                Ok(KeyField::Other)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<KeyField, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(KeyField::Other)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<KeyField, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(KeyField::Other)
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}
