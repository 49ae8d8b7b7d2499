//! Loading settings files and extracting the fields operators care about.

use crate::error::{SettingsError, SettingsResult};
use crate::jsonc::parse_jsonc;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Placeholder printed for fields that are absent or null.
pub const NOT_SET: &str = "(not set)";

/// A parsed settings document.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
    document: Value,
}

impl SettingsFile {
    /// Reads and parses a JSON-with-comments settings file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotFound`] if the file is missing, and
    /// a parse or I/O error otherwise.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SettingsError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SettingsError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let document = parse_jsonc(&text)?;
        debug!(path = %path.display(), "settings loaded");

        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    /// Path the settings were loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full comment-free document.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Extracts the summary fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a JSON object.
    pub fn summary(&self) -> SettingsResult<SettingsSummary> {
        Ok(SettingsSummary::deserialize(&self.document)?)
    }
}

/// The handful of settings printed by `jsonc-settings`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSummary {
    /// Instance title.
    pub title: Option<Value>,
    /// Listen address.
    pub ip: Option<Value>,
    /// Listen port.
    pub port: Option<Value>,
    /// Database driver name.
    pub db_type: Option<Value>,
    /// Driver-specific database settings.
    pub db_settings: Option<Value>,
}

impl SettingsSummary {
    /// The database file, for file-backed drivers such as `dirty`.
    #[must_use]
    pub fn db_filename(&self) -> Option<&Value> {
        self.db_settings.as_ref()?.get("filename")
    }

    /// Label/value pairs in display order.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", display_value(self.title.as_ref())),
            ("ip", display_value(self.ip.as_ref())),
            ("port", display_value(self.port.as_ref())),
            ("dbType", display_value(self.db_type.as_ref())),
            ("dbSettings.filename", display_value(self.db_filename())),
        ]
    }
}

/// Formats a scalar without string quotes; absent and null become [`NOT_SET`].
fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_SET.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
