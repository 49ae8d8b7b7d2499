//! Byte-level line scanning with offsets.

use std::io::{self, BufRead};

/// One raw line read from a log, terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// 1-based line number.
    pub number: u64,
    /// Byte offset of the first byte of the line.
    pub offset: u64,
    /// Raw bytes, including the trailing `\n` if present.
    pub bytes: Vec<u8>,
}

impl ScannedLine {
    /// Returns true if the line ends with `\n`.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.bytes.last() == Some(&b'\n')
    }

    /// Byte length of the raw line.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Returns true if the line holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Iterator over the raw lines of a reader.
///
/// Lines are split on `\n` only and returned verbatim, so CRLF files and
/// non-UTF-8 content survive untouched.
pub struct LineScanner<R> {
    reader: R,
    offset: u64,
    number: u64,
}

impl<R: BufRead> LineScanner<R> {
    /// Wraps a buffered reader positioned at the start of the log.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            number: 0,
        }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.offset
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = io::Result<ScannedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut bytes = Vec::new();
        match self.reader.read_until(b'\n', &mut bytes) {
            Ok(0) => None,
            Ok(n) => {
                self.number += 1;
                let line = ScannedLine {
                    number: self.number,
                    offset: self.offset,
                    bytes,
                };
                self.offset += n as u64;
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
