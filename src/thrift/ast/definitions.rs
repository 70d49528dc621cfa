//! Top-level definitions and their members

use super::{Annotations, Comment, Common, Field, FieldType, FieldValue, Loc, NodeType};
use serde::{Deserialize, Serialize};

/// `namespace <scope> <name>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub kind: NodeType,
    pub loc: Loc,
    pub scope: Common,
    pub name: Common,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

/// `include "<path>"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    pub kind: NodeType,
    pub loc: Loc,
    pub path: Common,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

/// `const <type> <name> = <value>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Const {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: Common,
    pub field_type: FieldType,
    pub initializer: FieldValue,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

/// `typedef <type> <name>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typedef {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: Common,
    pub definition_type: FieldType,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: Common,
    pub members: Vec<EnumMember>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

impl Enum {
    /// Effective member values: the explicit initializer, otherwise the
    /// previous value plus one, starting at zero.
    ///
    /// Returns `None` if an initializer does not fit in an `i64` or implicit
    /// numbering overflows.
    pub fn values(&self) -> Option<Vec<(&str, i64)>> {
        let mut next = Some(0i64);
        let mut values = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let value = match &member.initializer {
                Some(initializer) => super::values::parse_int_literal(&initializer.value)?,
                None => next?,
            };
            values.push((member.name.as_str(), value));
            next = value.checked_add(1);
        }
        Some(values)
    }
}

/// `NAME [= <int>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: Common,
    pub initializer: Option<Common>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

/// A struct, union or exception body; `kind` tells which
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Struct {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: Common,
    pub members: Vec<Field>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

impl Struct {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.members.iter().find(|field| field.name.value == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: Common,
    /// Name of the parent service, unresolved
    pub extends: Option<Common>,
    pub members: Vec<Function>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: Common,
    pub return_type: FieldType,
    pub params: Vec<Field>,
    pub throws: Option<Vec<Field>>,
    pub oneway: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub annotations: Option<Annotations>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, initializer: Option<&str>) -> EnumMember {
        let loc = Loc::default();
        EnumMember {
            kind: NodeType::EnumMember,
            loc,
            name: Common::identifier(name, loc),
            initializer: initializer.map(|value| Common::new(NodeType::IntegerLiteral, value, loc)),
            comments: vec![],
            annotations: None,
        }
    }

    fn enumeration(members: Vec<EnumMember>) -> Enum {
        Enum {
            kind: NodeType::EnumDefinition,
            loc: Loc::default(),
            name: Common::identifier("Status", Loc::default()),
            members,
            comments: vec![],
            annotations: None,
        }
    }

    #[test]
    fn test_enum_values_count_from_zero() {
        let status = enumeration(vec![member("A", None), member("B", None)]);
        assert_eq!(status.values(), Some(vec![("A", 0), ("B", 1)]));
    }

    #[test]
    fn test_enum_values_continue_after_initializer() {
        let status = enumeration(vec![
            member("A", Some("5")),
            member("B", None),
            member("C", Some("0x10")),
            member("D", None),
        ]);
        assert_eq!(
            status.values(),
            Some(vec![("A", 5), ("B", 6), ("C", 16), ("D", 17)])
        );
    }

    #[test]
    fn test_enum_values_overflow() {
        let last = enumeration(vec![member("A", Some("9223372036854775807"))]);
        assert_eq!(last.values(), Some(vec![("A", i64::MAX)]));

        let overflowing = enumeration(vec![
            member("A", Some("9223372036854775807")),
            member("B", None),
        ]);
        assert_eq!(overflowing.values(), None);
    }
}
