//! Source location spans.
//!
//! Every node, symbol and diagnostic carries a `Span`. Spans are plain byte
//! offsets into a single source file identified by `file`.

use std::fmt;

/// Error when creating a span from a range that exceeds `u32::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpanError {
    #[error("span start {0} exceeds u32::MAX")]
    StartTooLarge(usize),
    #[error("span end {0} exceeds u32::MAX")]
    EndTooLarge(usize),
}

/// Source location span.
///
/// Layout: 12 bytes
/// - file: u32 - index of the source file within the program
/// - start: u32 - byte offset from file start
/// - end: u32 - byte offset (exclusive)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    pub file: u32,
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span for synthesized code with no source location.
    pub const DUMMY: Span = Span {
        file: 0,
        start: 0,
        end: 0,
    };

    /// File index reserved for the built-in prelude.
    pub const PRELUDE_FILE: u32 = u32::MAX;

    #[inline]
    pub const fn new(file: u32, start: u32, end: u32) -> Self {
        Span { file, start, end }
    }

    /// Try to create a span from a byte range.
    #[inline]
    pub fn try_from_range(file: u32, range: std::ops::Range<usize>) -> Result<Self, SpanError> {
        let start =
            u32::try_from(range.start).map_err(|_| SpanError::StartTooLarge(range.start))?;
        let end = u32::try_from(range.end).map_err(|_| SpanError::EndTooLarge(range.end))?;
        Ok(Span { file, start, end })
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether this span points into the built-in prelude.
    #[inline]
    pub const fn is_prelude(&self) -> bool {
        self.file == Self::PRELUDE_FILE
    }

    /// Merge two spans of the same file into one covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        debug_assert_eq!(self.file, other.file, "merging spans from different files");
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_prelude() {
            write!(f, "<prelude>:{}..{}", self.start, self.end)
        } else {
            write!(f, "{}:{}..{}", self.file, self.start, self.end)
        }
    }
}
