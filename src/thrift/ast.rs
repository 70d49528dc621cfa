//! AST node model for Thrift IDL documents
//!
//! The tree is a closed set of node types. Variant positions (document members,
//! field types, constant values) are Rust enums; every node object carries its
//! [`NodeType`] as `kind`, a [`Loc`], and where applicable its leading comments
//! and trailing annotations.

pub mod common;
pub mod definitions;
pub mod document;
pub mod fields;
pub mod location;
pub mod node_type;
pub mod shape;
pub mod values;

pub use common::{Annotation, Annotations, Comment, Common};
pub use definitions::{
    Const, Enum, EnumMember, Function, Include, Namespace, Service, Struct, Typedef,
};
pub use document::{Document, DocumentMember};
pub use fields::{CollectionType, Field, FieldType, MapType, RequiredType};
pub use location::{Loc, SourceLocation, Span};
pub use node_type::NodeType;
pub use values::{ConstList, ConstMap, FieldValue, PropertyAssignment};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Read the `kind` discriminator of a buffered node object
fn node_kind<E: serde::de::Error>(value: &Value) -> Result<NodeType, E> {
    let kind = value
        .as_object()
        .ok_or_else(|| E::custom("expected a node object"))?
        .get("kind")
        .ok_or_else(|| E::missing_field("kind"))?;
    NodeType::deserialize(kind).map_err(E::custom)
}

/// Decode a buffered node object into the node type its kind selected
fn decode_node<T: DeserializeOwned, E: serde::de::Error>(value: Value) -> Result<T, E> {
    T::deserialize(value).map_err(E::custom)
}
