//! # thrift-idl
//!
//! A parser and canonical writer for the Apache Thrift IDL.
//!
//! ```rust,ignore
//! let engine = thrift_idl::initialize()?;
//! let doc = engine.parse("namespace js example")?;
//! assert_eq!(engine.write(&doc)?, "namespace js example\n");
//! ```
//!
//! The free functions [`parse`], [`write`], [`to_json`] and [`from_json`] are
//! the same operations without the engine handle.

pub mod thrift;

pub use thrift::ast::Document;
pub use thrift::engine::{initialize, Engine, WriteInput};
pub use thrift::error::{ErrorCode, IdlError, Result};
pub use thrift::json::{from_json, to_json};
pub use thrift::parser::parse;
pub use thrift::writer::write;
