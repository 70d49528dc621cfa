//! Recursive-descent parser for Thrift IDL
//!
//! The parser pulls tokens from the [`Lexer`] one at a time with a single token
//! of lookahead. Comment tokens never reach the grammar rules: they are
//! buffered as they stream past and handed to the next declaration that starts
//! (definition, field, enum member or function). Parsing is fail-fast; the
//! first lexical or grammar error aborts with a `ParseError`.

mod definitions;
mod fields;
mod values;

use crate::thrift::ast::{Comment, Common, Document, Loc, NodeType, Span};
use crate::thrift::error::{ErrorCode, IdlError, Result};
use crate::thrift::lexer::{unescape, Lexer, SpannedToken, Token};
use log::{debug, trace};

/// Deepest nesting of container types or constant lists and maps.
///
/// Kept low enough that the JSON form of any parsed document stays within
/// `serde_json`'s recursion limit when read back.
pub const MAX_NESTING: usize = 32;

/// Parse Thrift IDL source into a [`Document`]
pub fn parse(source: &str) -> Result<Document> {
    Parser::new(source).parse_document()
}

pub struct Parser<'src> {
    source: &'src str,
    lexer: Lexer<'src>,
    lookahead: Option<SpannedToken<'src>>,
    /// End of the last consumed token
    last_end: Span,
    pending_comments: Vec<Comment>,
    /// Open container types and constant collections
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let lexer = Lexer::new(source);
        let last_end = lexer.lines().span_at(0);
        Self {
            source,
            lexer,
            lookahead: None,
            last_end,
            pending_comments: Vec::new(),
            depth: 0,
        }
    }

    /// Parse the whole source; the parser is consumed
    pub fn parse_document(mut self) -> Result<Document> {
        debug!(bytes = self.source.len(); "Parsing Thrift document");
        self.advance()?;

        let mut members = Vec::new();
        while self.lookahead.is_some() {
            members.push(self.parse_definition()?);
        }

        let lines = self.lexer.lines();
        let mut document = Document::new(Loc::new(lines.span_at(0), lines.end()), members);
        document.trailing_comments = self.take_comments();

        debug!(members = document.members.len(); "Parsed Thrift document");
        Ok(document)
    }

    /// Move past the current lookahead and load the next non-comment token
    fn advance(&mut self) -> Result<()> {
        if let Some(token) = self.lookahead.take() {
            self.last_end = token.loc.end;
        }
        loop {
            match self.lexer.next() {
                None => return Ok(()),
                Some(Err(error)) => return Err(IdlError::from_lex(error, self.source)),
                Some(Ok(token)) => match token.kind {
                    Token::LineComment => {
                        self.pending_comments.push(Comment::line(token.text, token.loc))
                    }
                    Token::BlockComment => {
                        self.pending_comments.push(Comment::block(token.text, token.loc))
                    }
                    _ => {
                        trace!("token {} `{}`", token.kind, token.text);
                        self.lookahead = Some(token);
                        return Ok(());
                    }
                },
            }
        }
    }

    fn peek(&self) -> Option<Token> {
        self.lookahead.map(|token| token.kind)
    }

    fn at(&self, kind: Token) -> bool {
        self.peek() == Some(kind)
    }

    /// Consume the lookahead token
    fn bump(&mut self) -> Result<SpannedToken<'src>> {
        let token = self
            .lookahead
            .ok_or_else(|| self.unexpected("more input"))?;
        self.advance()?;
        Ok(token)
    }

    fn eat(&mut self, kind: Token) -> Result<Option<SpannedToken<'src>>> {
        if self.at(kind) {
            self.bump().map(Some)
        } else {
            Ok(None)
        }
    }

    fn expect(&mut self, kind: Token, expected: &str) -> Result<SpannedToken<'src>> {
        if self.at(kind) {
            self.bump()
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Skip one optional `,` or `;` list separator
    fn skip_separator(&mut self) -> Result<()> {
        if self.peek().is_some_and(|kind| kind.is_separator()) {
            self.bump()?;
        }
        Ok(())
    }

    /// Run `parse` one nesting level deeper, failing with E105 past [`MAX_NESTING`]
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            let loc = match &self.lookahead {
                Some(token) => token.loc,
                None => Loc::point(self.lexer.lines().end()),
            };
            return Err(self
                .error_at(
                    ErrorCode::E105,
                    format!("nesting is deeper than {MAX_NESTING} levels"),
                    loc,
                )
                .with_help("flatten the type or value with a typedef or a named constant"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.pending_comments)
    }

    /// Start of the lookahead token, or end of input
    fn start(&self) -> Span {
        match &self.lookahead {
            Some(token) => token.loc.start,
            None => self.lexer.lines().end(),
        }
    }

    /// Location from `start` to the end of the last consumed token
    fn finish(&self, start: Span) -> Loc {
        Loc::new(start, self.last_end)
    }

    /// A declaration name; keywords are accepted since the position is unambiguous
    fn parse_name(&mut self, expected: &str) -> Result<Common> {
        match self.peek() {
            Some(kind) if kind == Token::Identifier || kind.is_keyword() => {
                let token = self.bump()?;
                Ok(Common::identifier(token.text, token.loc))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn string_literal(&self, token: SpannedToken<'src>) -> Result<Common> {
        let value = unescape(token.string_contents()).map_err(|_| {
            IdlError::parse(ErrorCode::E003, "invalid escape sequence").at(token.loc, self.source)
        })?;
        Ok(Common::new(NodeType::StringLiteral, value, token.loc))
    }

    fn unexpected(&self, expected: &str) -> IdlError {
        match &self.lookahead {
            Some(token) => IdlError::parse(
                ErrorCode::E100,
                format!("expected {expected}, found {}", describe(token)),
            )
            .at(token.loc, self.source),
            None => IdlError::parse(
                ErrorCode::E101,
                format!("expected {expected}, found end of input"),
            )
            .at(Loc::point(self.lexer.lines().end()), self.source),
        }
    }

    fn error_at(&self, code: ErrorCode, message: impl Into<String>, loc: Loc) -> IdlError {
        IdlError::parse(code, message).at(loc, self.source)
    }
}

/// Token description for error messages, cut to its first line
fn describe(token: &SpannedToken<'_>) -> String {
    let first_line = token.text.lines().next().unwrap_or("");
    let excerpt: String = first_line.chars().take(32).collect();
    if excerpt.len() < token.text.len() {
        format!("`{excerpt}...`")
    } else {
        format!("`{excerpt}`")
    }
}
