//! Token definitions for Thrift IDL
//!
//! Tokens are produced by the logos derive. Strings, block comments and numbers
//! go through callbacks so that unterminated or malformed input is reported as
//! a [`LexErrorKind`] rather than falling apart into unrelated tokens.

use logos::Logos;
use std::fmt;

/// What went wrong while scanning a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LexErrorKind {
    #[default]
    UnrecognizedCharacter,
    UnterminatedString,
    UnterminatedComment,
    InvalidEscape,
    MalformedNumber,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            LexErrorKind::UnrecognizedCharacter => "unrecognized character",
            LexErrorKind::UnterminatedString => "unterminated string literal",
            LexErrorKind::UnterminatedComment => "unterminated block comment",
            LexErrorKind::InvalidEscape => "invalid escape sequence",
            LexErrorKind::MalformedNumber => "malformed numeric literal",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Integer,
    Hex,
    Double,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Declaration keywords
    #[token("namespace")]
    Namespace,
    #[token("include")]
    Include,
    #[token("const")]
    Const,
    #[token("typedef")]
    Typedef,
    #[token("enum")]
    Enum,
    #[token("struct")]
    Struct,
    #[token("union")]
    Union,
    #[token("exception")]
    Exception,
    #[token("service")]
    Service,

    // Modifiers
    #[token("required")]
    Required,
    #[token("optional")]
    Optional,
    #[token("oneway")]
    Oneway,
    #[token("throws")]
    Throws,
    #[token("extends")]
    Extends,

    // Types
    #[token("void")]
    Void,
    #[token("bool")]
    Bool,
    #[token("byte")]
    Byte,
    #[token("i8")]
    I8,
    #[token("i16")]
    I16,
    #[token("i32")]
    I32,
    #[token("i64")]
    I64,
    #[token("double")]
    Double,
    #[token("string")]
    String,
    #[token("binary")]
    Binary,
    #[token("list")]
    List,
    #[token("set")]
    Set,
    #[token("map")]
    Map,

    // Literals
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_][a-zA-Z0-9_]*)*")]
    Identifier,
    #[token("\"", |lex| quoted(lex, '"'))]
    #[token("'", |lex| quoted(lex, '\''))]
    StringLiteral,
    #[regex(r"[+-]?([0-9]|\.[0-9])([0-9a-zA-Z_.]|[eE][+-])*", number)]
    Number(NumberKind),

    // Punctuation
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("<")]
    LeftAngle,
    #[token(">")]
    RightAngle,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token(".")]
    Dot,
    #[token("*")]
    Star,

    // Trivia
    #[regex(r"//[^\r\n]*")]
    #[regex(r"#[^\r\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,
}

/// Scan to the closing quote, skipping backslash escapes
fn quoted(lex: &mut logos::Lexer<'_, Token>, quote: char) -> Result<(), LexErrorKind> {
    let mut escaped = false;
    for (offset, ch) in lex.remainder().char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            lex.bump(offset + 1);
            return Ok(());
        }
    }
    lex.bump(lex.remainder().len());
    Err(LexErrorKind::UnterminatedString)
}

fn block_comment(lex: &mut logos::Lexer<'_, Token>) -> Result<(), LexErrorKind> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn number(lex: &mut logos::Lexer<'_, Token>) -> Result<NumberKind, LexErrorKind> {
    classify_number(lex.slice()).ok_or(LexErrorKind::MalformedNumber)
}

/// Classify a numeric run: `42`, `0x2A`, `4.2`, `.5`, `1e10`, with optional sign
pub fn classify_number(text: &str) -> Option<NumberKind> {
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let unsigned = text.strip_prefix(|c| c == '+' || c == '-').unwrap_or(text);

    if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        let valid = !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit());
        return valid.then_some(NumberKind::Hex);
    }
    if is_digits(unsigned) {
        return Some(NumberKind::Integer);
    }

    let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };

    let whole_ok = whole.is_empty() || is_digits(whole);
    let fraction_ok = fraction.map_or(true, is_digits);
    let exponent_ok = exponent.map_or(true, |exp| {
        is_digits(exp.strip_prefix(|c| c == '+' || c == '-').unwrap_or(exp))
    });
    let has_digits = !whole.is_empty() || fraction.is_some();
    let is_real = fraction.is_some() || exponent.is_some();

    (whole_ok && fraction_ok && exponent_ok && has_digits && is_real).then_some(NumberKind::Double)
}

impl Token {
    pub fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment | Token::BlockComment)
    }

    /// Keywords can still be used as names in declaration positions
    pub fn is_keyword(&self) -> bool {
        self.keyword().is_some()
    }

    pub fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Token::Namespace => "namespace",
            Token::Include => "include",
            Token::Const => "const",
            Token::Typedef => "typedef",
            Token::Enum => "enum",
            Token::Struct => "struct",
            Token::Union => "union",
            Token::Exception => "exception",
            Token::Service => "service",
            Token::Required => "required",
            Token::Optional => "optional",
            Token::Oneway => "oneway",
            Token::Throws => "throws",
            Token::Extends => "extends",
            Token::Void => "void",
            Token::Bool => "bool",
            Token::Byte => "byte",
            Token::I8 => "i8",
            Token::I16 => "i16",
            Token::I32 => "i32",
            Token::I64 => "i64",
            Token::Double => "double",
            Token::String => "string",
            Token::Binary => "binary",
            Token::List => "list",
            Token::Set => "set",
            Token::Map => "map",
            Token::True => "true",
            Token::False => "false",
            _ => return None,
        };
        Some(keyword)
    }

    /// Base scalar type keywords (`i32`, `string`, ...)
    pub fn is_base_type(&self) -> bool {
        matches!(
            self,
            Token::Bool
                | Token::Byte
                | Token::I8
                | Token::I16
                | Token::I32
                | Token::I64
                | Token::Double
                | Token::String
                | Token::Binary
        )
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Comma | Token::Semicolon)
    }

    /// Short name used in token dumps
    pub fn name(&self) -> &'static str {
        if let Some(keyword) = self.keyword() {
            return keyword;
        }
        match self {
            Token::Identifier => "identifier",
            Token::StringLiteral => "string",
            Token::Number(NumberKind::Integer) => "integer",
            Token::Number(NumberKind::Hex) => "hex",
            Token::Number(NumberKind::Double) => "double-literal",
            Token::LeftBrace => "{",
            Token::RightBrace => "}",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBracket => "[",
            Token::RightBracket => "]",
            Token::LeftAngle => "<",
            Token::RightAngle => ">",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Equals => "=",
            Token::Dot => ".",
            Token::Star => "*",
            Token::LineComment => "line-comment",
            Token::BlockComment => "block-comment",
            _ => "keyword",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Result<Token, LexErrorKind>> {
        Token::lexer(source).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("struct structure i32 i32x"),
            vec![
                Ok(Token::Struct),
                Ok(Token::Identifier),
                Ok(Token::I32),
                Ok(Token::Identifier)
            ]
        );
    }

    #[test]
    fn test_dotted_identifier_is_one_token() {
        let mut lexer = Token::lexer("shared.SharedStruct");
        assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
        assert_eq!(lexer.slice(), "shared.SharedStruct");
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("{ } ( ) [ ] < > , ; : = . *"),
            vec![
                Ok(Token::LeftBrace),
                Ok(Token::RightBrace),
                Ok(Token::LeftParen),
                Ok(Token::RightParen),
                Ok(Token::LeftBracket),
                Ok(Token::RightBracket),
                Ok(Token::LeftAngle),
                Ok(Token::RightAngle),
                Ok(Token::Comma),
                Ok(Token::Semicolon),
                Ok(Token::Colon),
                Ok(Token::Equals),
                Ok(Token::Dot),
                Ok(Token::Star),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 -2 +3 0x1F 1.5 .5 -2.5e-3 1E10"),
            vec![
                Ok(Token::Number(NumberKind::Integer)),
                Ok(Token::Number(NumberKind::Integer)),
                Ok(Token::Number(NumberKind::Integer)),
                Ok(Token::Number(NumberKind::Hex)),
                Ok(Token::Number(NumberKind::Double)),
                Ok(Token::Number(NumberKind::Double)),
                Ok(Token::Number(NumberKind::Double)),
                Ok(Token::Number(NumberKind::Double)),
            ]
        );
    }

    #[test]
    fn test_field_id_then_colon() {
        assert_eq!(
            kinds("1:i32"),
            vec![
                Ok(Token::Number(NumberKind::Integer)),
                Ok(Token::Colon),
                Ok(Token::I32)
            ]
        );
    }

    #[test]
    fn test_malformed_numbers() {
        for source in ["12abc", "0x", "0xZZ", "1.", "1e", "1.2.3"] {
            assert_eq!(
                kinds(source),
                vec![Err(LexErrorKind::MalformedNumber)],
                "{source}"
            );
        }
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            kinds(r#""a \" b" 'c'"#),
            vec![Ok(Token::StringLiteral), Ok(Token::StringLiteral)]
        );
        assert_eq!(
            kinds("\"open"),
            vec![Err(LexErrorKind::UnterminatedString)]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("// one\n# two\n/* three\n */ struct"),
            vec![
                Ok(Token::LineComment),
                Ok(Token::LineComment),
                Ok(Token::BlockComment),
                Ok(Token::Struct)
            ]
        );
        assert_eq!(
            kinds("/* open"),
            vec![Err(LexErrorKind::UnterminatedComment)]
        );
    }

    #[test]
    fn test_unrecognized_character() {
        assert_eq!(
            kinds("@"),
            vec![Err(LexErrorKind::UnrecognizedCharacter)]
        );
    }

    #[test]
    fn test_classify_number() {
        assert_eq!(classify_number("007"), Some(NumberKind::Integer));
        assert_eq!(classify_number("-0X0a"), Some(NumberKind::Hex));
        assert_eq!(classify_number("3.14"), Some(NumberKind::Double));
        assert_eq!(classify_number("1e+5"), Some(NumberKind::Double));
        assert_eq!(classify_number("1e+"), None);
        assert_eq!(classify_number(".e5"), None);
    }
}
