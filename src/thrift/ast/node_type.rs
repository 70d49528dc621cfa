//! The closed set of node kinds
//!
//! Every node serialises its kind as the `kind` discriminator string. The
//! variant names double as the wire names.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    ThriftDocument,

    // Definitions
    NamespaceDefinition,
    IncludeDefinition,
    ConstDefinition,
    TypedefDefinition,
    EnumDefinition,
    EnumMember,
    StructDefinition,
    UnionDefinition,
    ExceptionDefinition,
    ServiceDefinition,
    FunctionDefinition,
    FieldDefinition,

    // Names
    Identifier,
    FieldID,
    ImplicitFieldID,

    // Base types
    BoolKeyword,
    ByteKeyword,
    I8Keyword,
    I16Keyword,
    I32Keyword,
    I64Keyword,
    DoubleKeyword,
    StringKeyword,
    BinaryKeyword,
    VoidKeyword,

    // Container types
    ListType,
    SetType,
    MapType,

    // Values
    ConstList,
    ConstMap,
    PropertyAssignment,
    StringLiteral,
    IntegerLiteral,
    HexLiteral,
    DoubleLiteral,
    BooleanLiteral,

    // Trivia and metadata
    CommentLine,
    CommentBlock,
    Annotation,
    Annotations,
}

impl NodeType {
    /// The IDL keyword spelling of a type or definition kind
    pub fn keyword(self) -> Option<&'static str> {
        let keyword = match self {
            NodeType::BoolKeyword => "bool",
            NodeType::ByteKeyword => "byte",
            NodeType::I8Keyword => "i8",
            NodeType::I16Keyword => "i16",
            NodeType::I32Keyword => "i32",
            NodeType::I64Keyword => "i64",
            NodeType::DoubleKeyword => "double",
            NodeType::StringKeyword => "string",
            NodeType::BinaryKeyword => "binary",
            NodeType::VoidKeyword => "void",
            NodeType::ListType => "list",
            NodeType::SetType => "set",
            NodeType::MapType => "map",
            NodeType::NamespaceDefinition => "namespace",
            NodeType::IncludeDefinition => "include",
            NodeType::ConstDefinition => "const",
            NodeType::TypedefDefinition => "typedef",
            NodeType::EnumDefinition => "enum",
            NodeType::StructDefinition => "struct",
            NodeType::UnionDefinition => "union",
            NodeType::ExceptionDefinition => "exception",
            NodeType::ServiceDefinition => "service",
            _ => return None,
        };
        Some(keyword)
    }

    pub fn is_base_type(self) -> bool {
        matches!(
            self,
            NodeType::BoolKeyword
                | NodeType::ByteKeyword
                | NodeType::I8Keyword
                | NodeType::I16Keyword
                | NodeType::I32Keyword
                | NodeType::I64Keyword
                | NodeType::DoubleKeyword
                | NodeType::StringKeyword
                | NodeType::BinaryKeyword
        )
    }

    /// Kinds a scalar field type may carry: base types and type references
    pub fn is_common_type(self) -> bool {
        self.is_base_type() || self == NodeType::Identifier
    }

    /// Kinds a scalar constant value may carry
    pub fn is_scalar_value(self) -> bool {
        matches!(
            self,
            NodeType::StringLiteral
                | NodeType::IntegerLiteral
                | NodeType::HexLiteral
                | NodeType::DoubleLiteral
                | NodeType::BooleanLiteral
                | NodeType::Identifier
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, NodeType::CommentLine | NodeType::CommentBlock)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_name_matches_display() {
        let json = serde_json::to_string(&NodeType::StructDefinition).unwrap();
        assert_eq!(json, "\"StructDefinition\"");
        assert_eq!(NodeType::StructDefinition.to_string(), "StructDefinition");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(serde_json::from_str::<NodeType>("\"Bogus\"").is_err());
    }

    #[test]
    fn test_type_kind_predicates() {
        assert!(NodeType::I64Keyword.is_base_type());
        assert!(NodeType::Identifier.is_common_type());
        assert!(!NodeType::VoidKeyword.is_common_type());
    }

    #[test]
    fn test_keyword_spelling() {
        assert_eq!(NodeType::I16Keyword.keyword(), Some("i16"));
        assert_eq!(NodeType::ExceptionDefinition.keyword(), Some("exception"));
        assert_eq!(NodeType::Identifier.keyword(), None);
    }
}
