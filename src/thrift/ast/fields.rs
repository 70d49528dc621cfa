//! Fields and field types

use super::{decode_node, node_kind, Annotations, Comment, Common, FieldValue, Loc, NodeType};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A struct, union or exception member, or a function parameter / thrown exception
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: Common,
    /// Explicit `N:` ID (`FieldID`) or the assigned negative ID (`ImplicitFieldID`)
    #[serde(rename = "fieldID")]
    pub field_id: Common,
    pub field_type: FieldType,
    pub required_type: RequiredType,
    pub default_value: Option<FieldValue>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

impl Field {
    pub fn is_implicit_id(&self) -> bool {
        self.field_id.kind == NodeType::ImplicitFieldID
    }

    /// The numeric field ID, explicit or implicit
    pub fn id(&self) -> Option<i64> {
        super::values::parse_int_literal(&self.field_id.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredType {
    Required,
    Optional,
    #[default]
    Default,
}

impl RequiredType {
    /// The keyword written before the field type, if any
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            RequiredType::Required => Some("required"),
            RequiredType::Optional => Some("optional"),
            RequiredType::Default => None,
        }
    }
}

impl fmt::Display for RequiredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("default"))
    }
}

/// The type of a field, constant, typedef or function result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldType {
    /// A base type keyword, `void`, or a reference to a named type
    Common(Common),
    /// `list<T>` or `set<T>`
    Collection(CollectionType),
    /// `map<K, V>`
    Map(MapType),
}

impl FieldType {
    pub fn kind(&self) -> NodeType {
        match self {
            FieldType::Common(common) => common.kind,
            FieldType::Collection(collection) => collection.kind,
            FieldType::Map(map) => map.kind,
        }
    }

    pub fn loc(&self) -> Loc {
        match self {
            FieldType::Common(common) => common.loc,
            FieldType::Collection(collection) => collection.loc,
            FieldType::Map(map) => map.loc,
        }
    }

    /// The type name for scalar types
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldType::Common(common) => Some(&common.value),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match node_kind::<D::Error>(&value)? {
            NodeType::ListType | NodeType::SetType => {
                decode_node(value).map(FieldType::Collection)
            }
            NodeType::MapType => decode_node(value).map(FieldType::Map),
            kind if kind.is_common_type() || kind == NodeType::VoidKeyword => {
                decode_node(value).map(FieldType::Common)
            }
            kind => Err(D::Error::custom(format!("`{kind}` is not a field type"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionType {
    pub kind: NodeType,
    pub loc: Loc,
    pub value_type: Option<Box<FieldType>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapType {
    pub kind: NodeType,
    pub loc: Loc,
    pub key_type: Option<Box<FieldType>>,
    pub value_type: Option<Box<FieldType>>,
}
