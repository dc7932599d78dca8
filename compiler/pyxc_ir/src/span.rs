//! Source location spans.
//!
//! A span is a byte range inside one source file. The file id travels with
//! the range because cross-file diagnostics (signature conflicts) label
//! locations in two different files at once.

use std::fmt;

/// Identifier of one source file within a compilation session.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct FileId(u32);

impl FileId {
    /// Placeholder for generated code and tests that do not care.
    pub const DUMMY: FileId = FileId(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        FileId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into a per-session file list.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// Source location span.
///
/// Layout: 12 bytes total
/// - file: `FileId` - owning source file
/// - start: u32 - byte offset from file start
/// - end: u32 - byte offset (exclusive)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub file: FileId,
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Dummy span for generated code.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    /// Create a new span.
    #[inline]
    pub const fn new(file: FileId, start: u32, end: u32) -> Self {
        Span { file, start, end }
    }

    /// Create a point span (zero-length).
    #[inline]
    pub const fn point(file: FileId, offset: u32) -> Span {
        Span {
            file,
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if an offset is within this span.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Merge two spans to create one covering both.
    ///
    /// Both spans are expected to come from the same file; the result
    /// keeps `self.file`.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        debug_assert!(self.file == other.file || other == Span::DUMMY);
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Convert to a `std::ops::Range`.
    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}..{}", self.file.0, self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Span;
    crate::static_assert_size!(Span, 12);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basic() {
        let span = Span::new(FileId::DUMMY, 10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(15));
        assert!(!span.contains(20));
    }

    #[test]
    fn test_span_merge_keeps_file() {
        let file = FileId::new(3);
        let merged = Span::new(file, 10, 20).merge(Span::new(file, 15, 30));
        assert_eq!(merged, Span::new(file, 10, 30));
    }

    #[test]
    fn test_point_span_is_empty() {
        let span = Span::point(FileId::new(1), 7);
        assert!(span.is_empty());
        assert_eq!(span.to_range(), 7..7);
    }

    #[test]
    fn test_debug_includes_file() {
        assert_eq!(format!("{:?}", Span::new(FileId::new(2), 1, 4)), "2@1..4");
    }
}
