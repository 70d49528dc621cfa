//! Source positions for AST nodes
//!
//! A [`Span`] is a single point in the source (1-based line and column, 0-based
//! byte index) and a [`Loc`] is the start/end pair delimiting a node. Columns
//! count bytes from the start of the line, so they line up with `index`.
//! [`SourceLocation`] converts byte offsets into spans with a binary search over
//! the line start table.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A point in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub index: usize,
}

impl Span {
    pub fn new(line: usize, column: usize, index: usize) -> Self {
        Self {
            line,
            column,
            index,
        }
    }
}

/// The source extent of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Loc {
    pub start: Span,
    pub end: Span,
}

impl Loc {
    pub fn new(start: Span, end: Span) -> Self {
        Self { start, end }
    }

    /// A zero-width location sitting at `at`
    pub fn point(at: Span) -> Self {
        Self { start: at, end: at }
    }

    /// Number of source bytes covered
    pub fn len(&self) -> usize {
        self.end.index.saturating_sub(self.start.index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte range covered by this location
    pub fn range(&self) -> Range<usize> {
        self.start.index..self.end.index
    }
}

/// Fast conversion from byte offsets to spans
#[derive(Debug, Clone)]
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
    len: usize,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Convert a byte offset to a span; offsets past the end are clamped
    pub fn span_at(&self, byte_offset: usize) -> Span {
        let index = byte_offset.min(self.len);
        let line = self
            .line_starts
            .binary_search(&index)
            .unwrap_or_else(|i| i - 1);

        Span::new(line + 1, index - self.line_starts[line] + 1, index)
    }

    /// Convert a byte range to a location
    pub fn loc(&self, range: Range<usize>) -> Loc {
        Loc::new(self.span_at(range.start), self.span_at(range.end))
    }

    /// The span just past the last byte of the source
    pub fn end(&self) -> Span {
        self.span_at(self.len)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where the given 1-based line starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|line| self.line_starts.get(line).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_at_single_line() {
        let lines = SourceLocation::new("struct");
        assert_eq!(lines.span_at(0), Span::new(1, 1, 0));
        assert_eq!(lines.span_at(3), Span::new(1, 4, 3));
        assert_eq!(lines.span_at(6), Span::new(1, 7, 6));
    }

    #[test]
    fn test_span_at_multiline() {
        let lines = SourceLocation::new("enum E {\n  A\n}");
        assert_eq!(lines.span_at(9), Span::new(2, 1, 9));
        assert_eq!(lines.span_at(11), Span::new(2, 3, 11));
        assert_eq!(lines.span_at(13), Span::new(3, 1, 13));
    }

    #[test]
    fn test_span_at_clamps_past_end() {
        let lines = SourceLocation::new("ab\n");
        assert_eq!(lines.span_at(99), Span::new(2, 1, 3));
        assert_eq!(lines.end(), Span::new(2, 1, 3));
    }

    #[test]
    fn test_columns_count_bytes() {
        // 'ö' is two bytes wide
        let lines = SourceLocation::new("\"ö\" x");
        assert_eq!(lines.span_at(5), Span::new(1, 6, 5));
    }

    #[test]
    fn test_loc_from_range() {
        let lines = SourceLocation::new("a\nbc");
        let loc = lines.loc(1..4);
        assert_eq!(loc.start, Span::new(1, 2, 1));
        assert_eq!(loc.end, Span::new(2, 3, 4));
        assert_eq!(loc.len(), 3);
        assert_eq!(loc.range(), 1..4);
    }

    #[test]
    fn test_line_start() {
        let lines = SourceLocation::new("one\ntwo\n");
        assert_eq!(lines.line_count(), 3);
        assert_eq!(lines.line_start(1), Some(0));
        assert_eq!(lines.line_start(2), Some(4));
        assert_eq!(lines.line_start(0), None);
        assert_eq!(lines.line_start(4), None);
    }
}
