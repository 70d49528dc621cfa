//! Leaf nodes and node metadata: names, literals, comments and annotations

use super::{Loc, NodeType};
use serde::{Deserialize, Serialize};

/// A leaf node holding source text: identifiers, keywords, literals and field IDs
///
/// Numeric and boolean literals keep the text exactly as written. String
/// literals hold the unescaped contents, without quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Common {
    pub kind: NodeType,
    pub value: String,
    pub loc: Loc,
}

impl Common {
    pub fn new(kind: NodeType, value: impl Into<String>, loc: Loc) -> Self {
        Self {
            kind,
            value: value.into(),
            loc,
        }
    }

    pub fn identifier(value: impl Into<String>, loc: Loc) -> Self {
        Self::new(NodeType::Identifier, value, loc)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// A comment attached to the declaration that follows it
///
/// `value` is the raw comment text including its delimiters (`//`, `#` or
/// `/* */`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub kind: NodeType,
    pub value: String,
    pub loc: Loc,
}

impl Comment {
    pub fn line(value: impl Into<String>, loc: Loc) -> Self {
        Self {
            kind: NodeType::CommentLine,
            value: value.into(),
            loc,
        }
    }

    pub fn block(value: impl Into<String>, loc: Loc) -> Self {
        Self {
            kind: NodeType::CommentBlock,
            value: value.into(),
            loc,
        }
    }
}

/// A trailing `( ... )` annotation block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    pub kind: NodeType,
    pub loc: Loc,
    pub members: Vec<Annotation>,
}

impl Annotations {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|annotation| annotation.name.value == name)
            .map(|annotation| annotation.value.as_str())
    }
}

/// One `name = "value"` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: Common,
    pub value: Common,
}
