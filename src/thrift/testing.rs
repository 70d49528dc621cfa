//! Testing utilities for Thrift ASTs
//!
//! Fluent assertions over parsed documents, plus the structural helpers the
//! property tests rely on.
//!
//! ```rust,ignore
//! use thrift_idl::thrift::parser::parse;
//! use thrift_idl::thrift::testing::assert_ast;
//!
//! let doc = parse("struct User { 1: required string id }").unwrap();
//!
//! assert_ast(&doc)
//!     .member_count(1)
//!     .member(0, |member| {
//!         member.name("User").assert_struct().field(0, |field| {
//!             field.name("id").id(1).type_text("string");
//!         });
//!     });
//! ```

mod assertions;
mod locations;

pub use assertions::{
    assert_ast, DocumentAssertion, EnumAssertion, FieldAssertion, FunctionAssertion,
    MemberAssertion, ServiceAssertion, StructAssertion,
};
pub use locations::{assert_locations_within, structure_of};
