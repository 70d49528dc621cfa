//! Error taxonomy shared by the parser, writer and JSON transcoder
//!
//! Every failure surfaces as one [`IdlError`]. Lexical and grammar errors are
//! both `ParseError`s and differ by [`ErrorCode`]. Errors serialise to
//! `{kind, message, code, help?, location?}` and render as miette diagnostics.

pub mod error_code;
pub mod location;

pub use error_code::ErrorCode;
pub use location::ErrorLocation;

use crate::thrift::ast::Loc;
use crate::thrift::lexer::{LexError, LexErrorKind};
use miette::{Diagnostic, LabeledSpan};
use serde::Serialize;
use std::fmt;

pub type Result<T> = std::result::Result<T, IdlError>;

/// Payload shared by all error kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ErrorLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind")]
pub enum IdlError {
    /// Malformed token or grammar violation in IDL text
    #[error("{}", .0.message)]
    #[serde(rename = "ParseError")]
    Parse(ErrorDetail),

    /// A tree the writer cannot render
    #[error("{}", .0.message)]
    #[serde(rename = "SerializationError")]
    Serialization(ErrorDetail),

    /// JSON that does not describe a document
    #[error("{}", .0.message)]
    #[serde(rename = "DeserializationError")]
    Deserialization(ErrorDetail),
}

fn detail(code: ErrorCode, message: impl Into<String>) -> ErrorDetail {
    ErrorDetail {
        message: message.into(),
        code,
        help: None,
        location: None,
    }
}

impl IdlError {
    pub fn parse(code: ErrorCode, message: impl Into<String>) -> Self {
        IdlError::Parse(detail(code, message))
    }

    pub fn serialization(code: ErrorCode, message: impl Into<String>) -> Self {
        IdlError::Serialization(detail(code, message))
    }

    pub fn deserialization(code: ErrorCode, message: impl Into<String>) -> Self {
        IdlError::Deserialization(detail(code, message))
    }

    /// Convert a lexer failure into a `ParseError` located in `source`
    pub fn from_lex(error: LexError, source: &str) -> Self {
        let (code, help) = match error.kind {
            LexErrorKind::UnterminatedString => (ErrorCode::E001, "add the closing quote"),
            LexErrorKind::UnrecognizedCharacter => (
                ErrorCode::E002,
                "this character cannot start a token in Thrift IDL",
            ),
            LexErrorKind::InvalidEscape => (
                ErrorCode::E003,
                r#"valid escapes are \\ \" \' \n \r \t \0 and \u{...}"#,
            ),
            LexErrorKind::MalformedNumber => (
                ErrorCode::E004,
                "numbers are written as 42, -7, 0x2A, 1.5 or 6.02e23",
            ),
            LexErrorKind::UnterminatedComment => {
                (ErrorCode::E005, "close the comment with `*/`")
            }
        };
        IdlError::parse(code, error.kind.to_string())
            .with_help(help)
            .at(error.loc, source)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.detail_mut().code = code;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.detail_mut().help = Some(help.into());
        self
    }

    pub fn with_location(mut self, location: ErrorLocation) -> Self {
        self.detail_mut().location = Some(location);
        self
    }

    /// Attach the location of `loc` within `source`
    pub fn at(self, loc: Loc, source: &str) -> Self {
        self.with_location(ErrorLocation::from_loc(loc, source))
    }

    pub fn detail(&self) -> &ErrorDetail {
        match self {
            IdlError::Parse(detail)
            | IdlError::Serialization(detail)
            | IdlError::Deserialization(detail) => detail,
        }
    }

    fn detail_mut(&mut self) -> &mut ErrorDetail {
        match self {
            IdlError::Parse(detail)
            | IdlError::Serialization(detail)
            | IdlError::Deserialization(detail) => detail,
        }
    }

    /// The wire name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            IdlError::Parse(_) => "ParseError",
            IdlError::Serialization(_) => "SerializationError",
            IdlError::Deserialization(_) => "DeserializationError",
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.detail().code
    }

    pub fn message(&self) -> &str {
        &self.detail().message
    }

    pub fn help(&self) -> Option<&str> {
        self.detail().help.as_deref()
    }

    pub fn location(&self) -> Option<&ErrorLocation> {
        self.detail().location.as_ref()
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<fmt::Error> for IdlError {
    fn from(_: fmt::Error) -> Self {
        IdlError::serialization(ErrorCode::E202, "failed to write output")
    }
}

impl Diagnostic for IdlError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help()
            .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let location = self.location()?;
        let label = LabeledSpan::new_with_span(
            Some(self.code().description().to_string()),
            (location.offset, location.length),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::ast::SourceLocation;

    #[test]
    fn test_error_schema() {
        let source = "struct A {";
        let loc = SourceLocation::new(source).loc(10..10);
        let error = IdlError::parse(ErrorCode::E101, "unexpected end of input")
            .with_help("close the struct with `}`")
            .at(loc, source);

        let json: serde_json::Value = serde_json::from_str(&error.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "ParseError",
                "message": "unexpected end of input",
                "code": "E101",
                "help": "close the struct with `}`",
                "location": {
                    "line": 1,
                    "column": 11,
                    "length": 0,
                    "sourceText": "struct A {"
                }
            })
        );
    }

    #[test]
    fn test_optional_parts_are_omitted() {
        let error = IdlError::serialization(ErrorCode::E200, "map type has no value type");
        assert_eq!(
            error.to_json().unwrap(),
            r#"{"kind":"SerializationError","message":"map type has no value type","code":"E200"}"#
        );
    }

    #[test]
    fn test_lex_error_conversion() {
        let source = "a @";
        let lex = LexError {
            kind: LexErrorKind::UnrecognizedCharacter,
            loc: SourceLocation::new(source).loc(2..3),
        };
        let error = IdlError::from_lex(lex, source);
        assert_eq!(error.kind(), "ParseError");
        assert_eq!(error.code(), ErrorCode::E002);
        assert_eq!(error.location().map(|l| l.column), Some(3));
        assert_eq!(error.to_string(), "unrecognized character");
    }

    #[test]
    fn test_diagnostic_label() {
        let source = "a @";
        let error = IdlError::parse(ErrorCode::E100, "unexpected `@`")
            .at(SourceLocation::new(source).loc(2..3), source);
        let labels: Vec<LabeledSpan> = Diagnostic::labels(&error).unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 2);
        assert_eq!(labels[0].len(), 1);
    }
}
