use std::fmt::{Display, Formatter};

use azfile_core::{Error, Result};

/// An inclusive byte range `[start, end]` of a file.
///
/// A range may also be empty: it then covers no byte and only exists so a
/// zero-byte upload still has a write to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRange {
    start: u64,
    len: u64,
}

impl FileRange {
    /// Create the range `[start, end]`.
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if end < start {
            return Err(Error::request_invalid(format!(
                "range end {end} is before range start {start}"
            )));
        }

        Ok(Self {
            start,
            len: end - start + 1,
        })
    }

    /// Create the range of `len` bytes starting at `start`.
    pub fn with_length(start: u64, len: u64) -> Self {
        Self { start, len }
    }

    /// First byte of the range.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last byte of the range, `None` if the range is empty.
    pub fn end(&self) -> Option<u64> {
        (self.len > 0).then(|| self.start + self.len - 1)
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the range covers no byte.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value of the `Range` header, `None` for the empty range.
    pub fn header_value(&self) -> Option<String> {
        self.end().map(|end| format!("bytes={}-{}", self.start, end))
    }
}

impl Display for FileRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.end() {
            Some(end) => write!(f, "[{}, {}]", self.start, end),
            None => write!(f, "[{}, empty]", self.start),
        }
    }
}
