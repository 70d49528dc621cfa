//! Located token stream over Thrift source
//!
//! Wraps the logos lexer, attaching a [`Loc`] to every token and validating
//! string escapes. The stream stops after the first error.

use super::escape::unescape;
use super::tokens::{LexErrorKind, Token};
use crate::thrift::ast::{Loc, SourceLocation};
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// A token with its source text and location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken<'src> {
    pub kind: Token,
    pub text: &'src str,
    pub loc: Loc,
}

impl SpannedToken<'_> {
    /// Contents of a string literal token without its quotes
    pub fn string_contents(&self) -> &str {
        let inner = self.text.len().saturating_sub(1).max(1);
        self.text.get(1..inner).unwrap_or("")
    }
}

/// Token dump record used by the `token-json` output
#[derive(Debug, Clone, Serialize)]
pub struct TokenRecord<'src> {
    pub kind: &'static str,
    pub text: &'src str,
    pub loc: Loc,
}

impl<'src> From<SpannedToken<'src>> for TokenRecord<'src> {
    fn from(token: SpannedToken<'src>) -> Self {
        Self {
            kind: token.kind.name(),
            text: token.text,
            loc: token.loc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub loc: Loc,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.kind, self.loc.start.line, self.loc.start.column
        )
    }
}

impl std::error::Error for LexError {}

pub struct Lexer<'src> {
    inner: logos::Lexer<'src, Token>,
    lines: SourceLocation,
    failed: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: Token::lexer(source),
            lines: SourceLocation::new(source),
            failed: false,
        }
    }

    pub fn source(&self) -> &'src str {
        self.inner.source()
    }

    /// Line table for the source being lexed
    pub fn lines(&self) -> &SourceLocation {
        &self.lines
    }

    fn check_escapes(&self, token: &SpannedToken<'src>) -> Result<(), LexError> {
        let contents_start = token.loc.start.index + 1;
        unescape(token.string_contents()).map(|_| ()).map_err(|bad| {
            let start = contents_start + bad.offset;
            LexError {
                kind: LexErrorKind::InvalidEscape,
                loc: self.lines.loc(start..start + bad.len),
            }
        })
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<SpannedToken<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.inner.next()?;
        let loc = self.lines.loc(self.inner.span());

        let item = match result {
            Ok(kind) => {
                let token = SpannedToken {
                    kind,
                    text: self.inner.slice(),
                    loc,
                };
                match kind {
                    Token::StringLiteral => self.check_escapes(&token).map(|_| token),
                    _ => Ok(token),
                }
            }
            Err(kind) => Err(LexError { kind, loc }),
        };
        self.failed = item.is_err();
        Some(item)
    }
}

/// Tokenize a source string, comments included
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

/// Collect all tokens, stopping at the first error
pub fn tokenize_all(source: &str) -> Result<Vec<SpannedToken<'_>>, LexError> {
    tokenize(source).collect()
}
