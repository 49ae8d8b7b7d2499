//! Last-write-wins compaction of a JSON Lines log.
//!
//! The compactor reads the input once, keeps the last line seen for each
//! key, and writes the survivors to `<input><suffix>`. The input is never
//! modified.
//!
//! ## Strategies
//!
//! - [`Strategy::Memory`] keeps every retained line in the table
//! - [`Strategy::TwoPass`] keeps only the byte offset of each retained line
//!   and copies the lines during a second sequential read
//!
//! Both produce the same bytes: retained lines in the order of their last
//! occurrence in the input.

use crate::config::{CompactConfig, Strategy};
use crate::error::{CompactError, CompactResult};
use crate::output::{output_path_for, OutputFile};
use crate::progress::Progress;
use crate::record::{LineKind, SkipReason};
use crate::scan::{LineScanner, ScannedLine};
use crate::table::{CompactionTable, TableEntry};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counters collected during a compaction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactStats {
    /// Lines read from the input, skipped lines included.
    pub lines_read: u64,
    /// Distinct keys found.
    pub unique_keys: u64,
    /// Lines that were not valid JSON.
    pub skipped_invalid_json: u64,
    /// Lines without a `key` field.
    pub skipped_missing_key: u64,
    /// Lines whose `key` was not a string.
    pub skipped_non_string_key: u64,
    /// Keyed lines superseded by a later line of the same key.
    pub obsolete_versions: u64,
    /// Keys dropped because their last line was a tombstone.
    pub tombstones_removed: u64,
    /// Lines in the output.
    pub records_written: u64,
    /// Input size in bytes.
    pub bytes_before: u64,
    /// Output size in bytes.
    pub bytes_after: u64,
}

impl CompactStats {
    /// Total lines left out for any reason.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped_invalid_json + self.skipped_missing_key + self.skipped_non_string_key
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::InvalidJson => self.skipped_invalid_json += 1,
            SkipReason::MissingKey => self.skipped_missing_key += 1,
            SkipReason::NonStringKey => self.skipped_non_string_key += 1,
        }
    }
}

/// The result of a compaction run.
#[derive(Debug, Clone)]
pub struct CompactReport {
    /// The input log.
    pub input: PathBuf,
    /// The output log (not created on a dry run).
    pub output: PathBuf,
    /// Whether the output file was written.
    pub written: bool,
    /// Run counters.
    pub stats: CompactStats,
}

/// Location of a retained line in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    offset: u64,
    len: u64,
    terminated: bool,
}

/// Compacts dirty-database logs.
///
/// # Example
///
/// ```no_run
/// use dirtylog_core::{CompactConfig, Compactor, NoProgress};
/// use std::path::Path;
///
/// let compactor = Compactor::new(CompactConfig::default());
/// let report = compactor.compact(Path::new("dirty.db"), &mut NoProgress).unwrap();
/// println!("{} keys written to {:?}", report.stats.unique_keys, report.output);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compactor {
    config: CompactConfig,
}

impl Compactor {
    /// Creates a compactor with the given configuration.
    #[must_use]
    pub fn new(config: CompactConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CompactConfig {
        &self.config
    }

    /// Returns the output path for `input`.
    #[must_use]
    pub fn output_path(&self, input: &Path) -> PathBuf {
        output_path_for(input, &self.config.output_suffix)
    }

    /// Checks that `input` is an existing file and its output does not exist.
    ///
    /// Returns the output path.
    ///
    /// # Errors
    ///
    /// Returns a precondition error (see [`CompactError::is_precondition`])
    /// if either check fails.
    pub fn check_paths(&self, input: &Path) -> CompactResult<PathBuf> {
        match fs::metadata(input) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(CompactError::InputNotFile {
                    path: input.to_path_buf(),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CompactError::InputNotFound {
                    path: input.to_path_buf(),
                })
            }
            Err(e) => return Err(CompactError::io(input, e)),
        }

        let output = self.output_path(input);
        match fs::symlink_metadata(&output) {
            Ok(_) => Err(CompactError::OutputExists { path: output }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(output),
            Err(e) => Err(CompactError::io(&output, e)),
        }
    }

    /// Compacts `input` into its output path.
    ///
    /// # Errors
    ///
    /// Returns an error if a precondition fails or on any I/O error.
    /// Malformed lines are counted in the stats, not returned as errors.
    pub fn compact(
        &self,
        input: &Path,
        progress: &mut dyn Progress,
    ) -> CompactResult<CompactReport> {
        let output = self.check_paths(input)?;

        debug!(
            input = %input.display(),
            output = %output.display(),
            strategy = %self.config.strategy,
            dry_run = self.config.dry_run,
            "starting compaction"
        );

        let mut stats = CompactStats {
            bytes_before: fs::metadata(input)
                .map_err(|e| CompactError::io(input, e))?
                .len(),
            ..CompactStats::default()
        };

        let written = match self.config.strategy {
            Strategy::Memory => self.compact_in_memory(input, &output, progress, &mut stats)?,
            Strategy::TwoPass => self.compact_two_pass(input, &output, progress, &mut stats)?,
        };

        if written {
            info!(
                lines_read = stats.lines_read,
                unique_keys = stats.unique_keys,
                skipped = stats.skipped(),
                output = %output.display(),
                "compaction complete"
            );
        }

        Ok(CompactReport {
            input: input.to_path_buf(),
            output,
            written,
            stats,
        })
    }

    fn compact_in_memory(
        &self,
        input: &Path,
        output: &Path,
        progress: &mut dyn Progress,
        stats: &mut CompactStats,
    ) -> CompactResult<bool> {
        let table = self.scan(input, progress, stats, |line| line.bytes)?;
        let retained = self.finish_table(table, stats);

        stats.bytes_after = retained
            .iter()
            .map(|(_, entry)| terminated_len(&entry.value))
            .sum();

        if self.config.dry_run {
            return Ok(false);
        }

        let mut out = OutputFile::create(output)?;
        for (_, entry) in &retained {
            out.write_line(&entry.value)?;
        }
        out.finish()?;
        Ok(true)
    }

    fn compact_two_pass(
        &self,
        input: &Path,
        output: &Path,
        progress: &mut dyn Progress,
        stats: &mut CompactStats,
    ) -> CompactResult<bool> {
        let table = self.scan(input, progress, stats, |line| Span {
            offset: line.offset,
            len: line.len(),
            terminated: line.is_terminated(),
        })?;
        let retained = self.finish_table(table, stats);

        stats.bytes_after = retained
            .iter()
            .map(|(_, entry)| entry.value.len + u64::from(!entry.value.terminated))
            .sum();

        if self.config.dry_run {
            return Ok(false);
        }

        let mut out = OutputFile::create(output)?;
        copy_spans(
            open_input(input)?,
            input,
            retained.iter().map(|(_, entry)| entry.value),
            |line| out.write_line(line),
        )?;
        out.finish()?;
        Ok(true)
    }

    /// Reads every line of `input` into a table, classifying as it goes.
    fn scan<V>(
        &self,
        input: &Path,
        progress: &mut dyn Progress,
        stats: &mut CompactStats,
        mut to_value: impl FnMut(ScannedLine) -> V,
    ) -> CompactResult<CompactionTable<V>> {
        let interval = self.config.progress_interval;
        let mut table = CompactionTable::new();

        for line in LineScanner::new(open_input(input)?) {
            let line = line.map_err(|e| CompactError::io(input, e))?;
            stats.lines_read += 1;

            let (key, tombstone) = match LineKind::classify(&line.bytes) {
                LineKind::Live { key } => (key, false),
                LineKind::Tombstone { key } => (key, true),
                LineKind::Skipped(reason) => {
                    warn!(line = line.number, %reason, "skipping record");
                    stats.record_skip(reason);
                    tick(progress, interval, stats.lines_read);
                    continue;
                }
            };

            let seq = line.number;
            table.insert(
                key,
                TableEntry {
                    seq,
                    tombstone,
                    value: to_value(line),
                },
            );
            tick(progress, interval, stats.lines_read);
        }

        progress.finish(stats.lines_read);
        Ok(table)
    }

    fn finish_table<V>(
        &self,
        table: CompactionTable<V>,
        stats: &mut CompactStats,
    ) -> Vec<(String, TableEntry<V>)> {
        stats.unique_keys = table.len() as u64;
        stats.obsolete_versions = table.replaced();
        if self.config.remove_tombstones {
            stats.tombstones_removed = table.tombstones() as u64;
        }

        let retained = table.into_retained(self.config.remove_tombstones);
        stats.records_written = retained.len() as u64;
        retained
    }
}

fn open_input(input: &Path) -> CompactResult<BufReader<File>> {
    File::open(input)
        .map(BufReader::new)
        .map_err(|e| CompactError::io(input, e))
}

/// Second pass of [`Strategy::TwoPass`]: streams `reader` and hands each
/// line found at a retained span to `write`.
///
/// `spans` must be in input order. A span whose line has a different length,
/// or that is never reached, means the input changed since the first pass.
fn copy_spans<R: BufRead>(
    reader: R,
    input: &Path,
    spans: impl IntoIterator<Item = Span>,
    mut write: impl FnMut(&[u8]) -> CompactResult<()>,
) -> CompactResult<()> {
    let mut wanted = spans.into_iter().peekable();

    for line in LineScanner::new(reader) {
        let line = line.map_err(|e| CompactError::io(input, e))?;
        match wanted.peek() {
            Some(span) if span.offset == line.offset => {
                if span.len != line.len() {
                    return Err(changed_between_passes(input));
                }
                write(&line.bytes)?;
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }

    if wanted.peek().is_some() {
        return Err(changed_between_passes(input));
    }
    Ok(())
}

fn tick(progress: &mut dyn Progress, interval: u64, lines_read: u64) {
    if interval > 0 && lines_read % interval == 0 {
        progress.tick(lines_read);
    }
}

fn terminated_len(line: &[u8]) -> u64 {
    line.len() as u64 + u64::from(line.last() != Some(&b'\n'))
}

fn changed_between_passes(input: &Path) -> CompactError {
    CompactError::io(
        input,
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input changed between compaction passes",
        ),
    )
}
