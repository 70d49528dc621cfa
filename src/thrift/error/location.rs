//! Source excerpt attached to an error

use crate::thrift::ast::Loc;
use serde::Serialize;

/// Where an error happened, with enough context to draw a caret diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLocation {
    pub line: usize,
    pub column: usize,
    pub length: usize,
    /// The full source line containing the error, without its line break
    pub source_text: String,
    /// Byte offset of the error start, for labelled spans
    #[serde(skip)]
    pub offset: usize,
}

impl ErrorLocation {
    pub fn from_loc(loc: Loc, source: &str) -> Self {
        let offset = loc.start.index.min(source.len());
        Self {
            line: loc.start.line,
            column: loc.start.column,
            length: loc.len(),
            source_text: line_text(source, offset).to_string(),
            offset,
        }
    }

    /// Location of a 1-based line/column pair, as reported by serde_json
    pub fn from_line_column(source: &str, line: usize, column: usize) -> Self {
        let line = line.max(1);
        let line_start = source
            .split_inclusive('\n')
            .take(line - 1)
            .map(str::len)
            .sum::<usize>()
            .min(source.len());
        let text = line_text(source, line_start);
        let column = column.clamp(1, text.len() + 1);
        Self {
            line,
            column,
            length: 0,
            source_text: text.to_string(),
            offset: line_start + column - 1,
        }
    }
}

/// The line of `source` containing byte `offset`
fn line_text(source: &str, offset: usize) -> &str {
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i);
    source[start..end].trim_end_matches('\r')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::ast::SourceLocation;

    #[test]
    fn test_from_loc_carries_line_excerpt() {
        let source = "struct A {\n  1: i32 x\n}\n";
        let lines = SourceLocation::new(source);
        let location = ErrorLocation::from_loc(lines.loc(16..19), source);
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 6);
        assert_eq!(location.length, 3);
        assert_eq!(location.source_text, "  1: i32 x");
        assert_eq!(location.offset, 16);
    }

    #[test]
    fn test_from_loc_at_end_of_input() {
        let source = "struct A {";
        let lines = SourceLocation::new(source);
        let location = ErrorLocation::from_loc(lines.loc(10..10), source);
        assert_eq!(location.line, 1);
        assert_eq!(location.column, 11);
        assert_eq!(location.length, 0);
        assert_eq!(location.source_text, "struct A {");
    }

    #[test]
    fn test_from_line_column() {
        let source = "{\n  \"kind\": 1\n}";
        let location = ErrorLocation::from_line_column(source, 2, 12);
        assert_eq!(location.source_text, "  \"kind\": 1");
        assert_eq!(location.offset, 13);
    }
}
