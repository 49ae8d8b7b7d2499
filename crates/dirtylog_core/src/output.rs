//! Output path derivation and exclusive-create output writing.

use crate::error::{CompactError, CompactResult};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Returns `input` with `suffix` appended to its final component.
///
/// `db/dirty.db` with `.new` becomes `db/dirty.db.new`.
#[must_use]
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// A freshly created output log.
///
/// The file is opened with `create_new`, so an output that already exists
/// is never truncated or appended to, even if it appeared after the
/// precondition check.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<File>,
    bytes_written: u64,
    lines_written: u64,
}

impl OutputFile {
    /// Creates the output file.
    ///
    /// # Errors
    ///
    /// Returns [`CompactError::OutputExists`] if the path already exists and
    /// [`CompactError::Io`] for any other failure.
    pub fn create(path: &Path) -> CompactResult<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => CompactError::OutputExists {
                    path: path.to_path_buf(),
                },
                _ => CompactError::io(path, e),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            bytes_written: 0,
            lines_written: 0,
        })
    }

    /// Writes one raw line, adding a `\n` if it has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_line(&mut self, line: &[u8]) -> CompactResult<()> {
        self.writer
            .write_all(line)
            .map_err(|e| CompactError::io(&self.path, e))?;
        self.bytes_written += line.len() as u64;

        if line.last() != Some(&b'\n') {
            self.writer
                .write_all(b"\n")
                .map_err(|e| CompactError::io(&self.path, e))?;
            self.bytes_written += 1;
        }

        self.lines_written += 1;
        Ok(())
    }

    /// Bytes written so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Lines written so far.
    #[must_use]
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Path of the output file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes buffered data and syncs the file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush or sync fails.
    pub fn finish(mut self) -> CompactResult<u64> {
        self.writer
            .flush()
            .map_err(|e| CompactError::io(&self.path, e))?;
        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| CompactError::io(&self.path, e))?;
        Ok(self.bytes_written)
    }
}
