//! Lexer for Thrift IDL
//!
//! Turns source text into a lazy stream of located tokens. Whitespace is
//! skipped; comments are kept as trivia tokens so the parser can attach them
//! to the declaration that follows.

pub mod escape;
pub mod lexer_impl;
pub mod tokens;

pub use escape::{escape, unescape};
pub use lexer_impl::{tokenize, tokenize_all, LexError, Lexer, SpannedToken, TokenRecord};
pub use tokens::{LexErrorKind, NumberKind, Token};
