//! Thrift IDL front end
//!
//! Source text flows `lexer` -> `parser` -> [`ast::Document`]; the `writer`
//! renders a document back to canonical IDL and `json` maps it to and from its
//! interchange form. All failures are [`error::IdlError`] values.

pub mod ast;
pub mod engine;
pub mod error;
pub mod json;
pub mod lexer;
pub mod parser;
pub mod processor;
pub mod testing;
pub mod writer;
