//! Error codes for Thrift IDL diagnostics.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Writer errors
//! - `E3xx` - JSON decoding errors

use serde::Serialize;
use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but never closed.
    E001,

    /// Unrecognized character.
    E002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are: `\\`, `\"`, `\'`, `\n`, `\r`, `\t`, `\0`, `\u{...}`.
    E003,

    /// Malformed numeric literal, such as `12abc`, `0x` or `1.`.
    E004,

    /// Unterminated block comment.
    E005,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Unexpected end of input.
    E101,

    /// Invalid field ID.
    ///
    /// Explicit field IDs are decimal integers from 1 to 32767.
    E102,

    /// Duplicate field ID within one field list.
    E103,

    /// Enum value is not an integer literal.
    E104,

    /// Types or constant values nested deeper than the parser allows.
    E105,

    // =========================================================================
    // Writer Errors (E2xx)
    // =========================================================================
    /// Incomplete type: a list or set without an element type, or a map
    /// without a key or value type.
    E200,

    /// Node kind not allowed at its position in the tree.
    E201,

    /// The output buffer rejected a write.
    E202,

    // =========================================================================
    // JSON Decoding Errors (E3xx)
    // =========================================================================
    /// Malformed JSON, unknown `kind`, missing field or wrong value type.
    E300,

    /// Known node kind in a position that does not admit it.
    E301,
}

impl ErrorCode {
    /// Short description shown next to the code.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unrecognized character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "malformed numeric literal",
            ErrorCode::E005 => "unterminated block comment",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E102 => "invalid field ID",
            ErrorCode::E103 => "duplicate field ID",
            ErrorCode::E104 => "invalid enum value",
            ErrorCode::E105 => "nesting too deep",
            ErrorCode::E200 => "incomplete type",
            ErrorCode::E201 => "invalid node kind",
            ErrorCode::E202 => "write failed",
            ErrorCode::E300 => "malformed AST JSON",
            ErrorCode::E301 => "invalid node kind",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
