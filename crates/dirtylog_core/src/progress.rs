//! Progress reporting during the scan.

use std::io::Write;

/// Receives progress notifications from the compactor.
///
/// Progress output is cosmetic; implementations must not fail the run.
pub trait Progress {
    /// Called every `progress_interval` lines with the running line count.
    fn tick(&mut self, lines_read: u64);

    /// Called once when the scan is complete.
    fn finish(&mut self, _lines_read: u64) {}
}

/// Discards all progress notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn tick(&mut self, _lines_read: u64) {}
}

/// Prints one `.` per tick, and a newline at the end if any dot was printed.
#[derive(Debug)]
pub struct DotProgress<W: Write> {
    out: W,
    dots: u64,
}

impl<W: Write> DotProgress<W> {
    /// Creates a dot printer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, dots: 0 }
    }

    /// Number of dots printed so far.
    #[must_use]
    pub fn dots(&self) -> u64 {
        self.dots
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Progress for DotProgress<W> {
    fn tick(&mut self, _lines_read: u64) {
        self.dots += 1;
        let _ = self.out.write_all(b".");
        let _ = self.out.flush();
    }

    fn finish(&mut self, _lines_read: u64) {
        if self.dots > 0 {
            let _ = self.out.write_all(b"\n");
            let _ = self.out.flush();
        }
    }
}
