//! Compact command implementation.

use crate::CliError;
use dirtylog_core::{CompactConfig, CompactReport, CompactStats, Compactor, DotProgress};
use std::path::Path;

/// Runs the compact command.
pub fn run(path: &Path, config: CompactConfig) -> Result<CompactReport, CliError> {
    let compactor = Compactor::new(config);

    // fail before printing anything if the run cannot start
    compactor.check_paths(path)?;

    println!("Compacting {}", path.display());
    if compactor.config().dry_run {
        println!("(dry run - no file will be written)");
    }

    let mut progress = DotProgress::new(std::io::stdout());
    let report = compactor.compact(path, &mut progress)?;

    print_summary(&report.stats, compactor.config().remove_tombstones);

    if report.written {
        println!(
            "Wrote {} records to {}",
            report.stats.records_written,
            report.output.display()
        );
    } else {
        println!(
            "Would write {} records to {}",
            report.stats.records_written,
            report.output.display()
        );
    }

    Ok(report)
}

fn print_summary(stats: &CompactStats, remove_tombstones: bool) {
    println!(
        "Read {} lines, found {} unique keys",
        stats.lines_read, stats.unique_keys
    );

    if stats.skipped() > 0 {
        println!("  Skipped lines:     {}", stats.skipped());
        for (label, count) in [
            ("invalid JSON", stats.skipped_invalid_json),
            ("missing key", stats.skipped_missing_key),
            ("non-string key", stats.skipped_non_string_key),
        ] {
            if count > 0 {
                println!("    {label}: {count}");
            }
        }
    }

    println!("  Obsolete versions: {}", stats.obsolete_versions);
    if remove_tombstones {
        println!("  Tombstones removed: {}", stats.tombstones_removed);
    }
    println!("  Size before: {} bytes", stats.bytes_before);
    println!("  Size after:  {} bytes", stats.bytes_after);
    println!(
        "  Space saved: {} bytes ({:.1}%)",
        stats.bytes_before.saturating_sub(stats.bytes_after),
        if stats.bytes_before > 0 {
            (stats.bytes_before.saturating_sub(stats.bytes_after) as f64
                / stats.bytes_before as f64)
                * 100.0
        } else {
            0.0
        }
    );
}
