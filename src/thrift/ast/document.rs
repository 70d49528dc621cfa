//! Document root and top-level member variants

use super::{
    decode_node, node_kind, Annotations, Comment, Common, Const, Enum, Include, Loc, Namespace,
    NodeType, Service, Struct, Typedef,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A parsed Thrift file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub kind: NodeType,
    pub loc: Loc,
    pub members: Vec<DocumentMember>,
    /// Comments after the last definition
    #[serde(default)]
    pub trailing_comments: Vec<Comment>,
}

impl Document {
    pub fn new(loc: Loc, members: Vec<DocumentMember>) -> Self {
        Self {
            kind: NodeType::ThriftDocument,
            loc,
            members,
            trailing_comments: vec![],
        }
    }

    /// Find a named definition; namespaces and includes have no name
    pub fn find(&self, name: &str) -> Option<&DocumentMember> {
        self.members
            .iter()
            .find(|member| member.name().map(Common::as_str) == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocumentMember {
    Namespace(Namespace),
    Include(Include),
    Const(Const),
    Typedef(Typedef),
    Enum(Enum),
    Struct(Struct),
    Union(Struct),
    Exception(Struct),
    Service(Service),
}

impl DocumentMember {
    pub fn kind(&self) -> NodeType {
        match self {
            DocumentMember::Namespace(node) => node.kind,
            DocumentMember::Include(node) => node.kind,
            DocumentMember::Const(node) => node.kind,
            DocumentMember::Typedef(node) => node.kind,
            DocumentMember::Enum(node) => node.kind,
            DocumentMember::Struct(node)
            | DocumentMember::Union(node)
            | DocumentMember::Exception(node) => node.kind,
            DocumentMember::Service(node) => node.kind,
        }
    }

    pub fn loc(&self) -> Loc {
        match self {
            DocumentMember::Namespace(node) => node.loc,
            DocumentMember::Include(node) => node.loc,
            DocumentMember::Const(node) => node.loc,
            DocumentMember::Typedef(node) => node.loc,
            DocumentMember::Enum(node) => node.loc,
            DocumentMember::Struct(node)
            | DocumentMember::Union(node)
            | DocumentMember::Exception(node) => node.loc,
            DocumentMember::Service(node) => node.loc,
        }
    }

    pub fn name(&self) -> Option<&Common> {
        match self {
            DocumentMember::Namespace(_) | DocumentMember::Include(_) => None,
            DocumentMember::Const(node) => Some(&node.name),
            DocumentMember::Typedef(node) => Some(&node.name),
            DocumentMember::Enum(node) => Some(&node.name),
            DocumentMember::Struct(node)
            | DocumentMember::Union(node)
            | DocumentMember::Exception(node) => Some(&node.name),
            DocumentMember::Service(node) => Some(&node.name),
        }
    }

    pub fn comments(&self) -> &[Comment] {
        match self {
            DocumentMember::Namespace(node) => &node.comments,
            DocumentMember::Include(node) => &node.comments,
            DocumentMember::Const(node) => &node.comments,
            DocumentMember::Typedef(node) => &node.comments,
            DocumentMember::Enum(node) => &node.comments,
            DocumentMember::Struct(node)
            | DocumentMember::Union(node)
            | DocumentMember::Exception(node) => &node.comments,
            DocumentMember::Service(node) => &node.comments,
        }
    }

    pub fn annotations(&self) -> Option<&Annotations> {
        match self {
            DocumentMember::Namespace(node) => node.annotations.as_ref(),
            DocumentMember::Include(node) => node.annotations.as_ref(),
            DocumentMember::Const(node) => node.annotations.as_ref(),
            DocumentMember::Typedef(node) => node.annotations.as_ref(),
            DocumentMember::Enum(node) => node.annotations.as_ref(),
            DocumentMember::Struct(node)
            | DocumentMember::Union(node)
            | DocumentMember::Exception(node) => node.annotations.as_ref(),
            DocumentMember::Service(node) => node.annotations.as_ref(),
        }
    }
}

impl<'de> Deserialize<'de> for DocumentMember {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match node_kind::<D::Error>(&value)? {
            NodeType::NamespaceDefinition => decode_node(value).map(DocumentMember::Namespace),
            NodeType::IncludeDefinition => decode_node(value).map(DocumentMember::Include),
            NodeType::ConstDefinition => decode_node(value).map(DocumentMember::Const),
            NodeType::TypedefDefinition => decode_node(value).map(DocumentMember::Typedef),
            NodeType::EnumDefinition => decode_node(value).map(DocumentMember::Enum),
            NodeType::StructDefinition => decode_node(value).map(DocumentMember::Struct),
            NodeType::UnionDefinition => decode_node(value).map(DocumentMember::Union),
            NodeType::ExceptionDefinition => decode_node(value).map(DocumentMember::Exception),
            NodeType::ServiceDefinition => decode_node(value).map(DocumentMember::Service),
            kind => Err(D::Error::custom(format!(
                "`{kind}` is not a top-level definition"
            ))),
        }
    }
}
