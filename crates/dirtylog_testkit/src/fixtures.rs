//! Temporary files for tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name used for temporary logs.
pub const LOG_FILE_NAME: &str = "dirty.db";

/// A log file inside its own temporary directory.
pub struct TempLog {
    path: PathBuf,
    /// Kept alive to prevent cleanup.
    _temp_dir: TempDir,
}

impl TempLog {
    /// Creates a log with the given raw contents.
    pub fn from_bytes(content: &[u8]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(LOG_FILE_NAME);
        fs::write(&path, content).expect("Failed to write log");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Creates a log with one line per entry, each terminated by `\n`.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        Self::from_bytes(join_lines(lines).as_bytes())
    }

    /// Path of the log.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the log.
    pub fn dir(&self) -> &Path {
        self._temp_dir.path()
    }

    /// The conventional output path, `<log>.new`.
    pub fn output_path(&self) -> PathBuf {
        self.dir().join(format!("{LOG_FILE_NAME}.new"))
    }

    /// Raw bytes of the input log.
    pub fn read_input(&self) -> Vec<u8> {
        fs::read(&self.path).expect("Failed to read log")
    }

    /// Raw bytes of the output log.
    pub fn read_output(&self) -> Vec<u8> {
        fs::read(self.output_path()).expect("Failed to read output")
    }

    /// Output lines without their terminators.
    pub fn output_lines(&self) -> Vec<String> {
        String::from_utf8(self.read_output())
            .expect("Output is not UTF-8")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Places a file at the output path, as a previous run would.
    pub fn occupy_output(&self, content: &[u8]) {
        fs::write(self.output_path(), content).expect("Failed to write output");
    }
}

/// A settings file inside its own temporary directory.
pub struct TempSettings {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempSettings {
    /// Creates `settings.json` with the given text.
    pub fn new(text: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, text).expect("Failed to write settings");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Joins lines with `\n`, terminating the last one too.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}
