//! Constant values: scalar literals, lists and maps

use super::{decode_node, node_kind, Common, Loc, NodeType};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A constant or default value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A literal or a reference to another constant
    Common(Common),
    List(ConstList),
    Map(ConstMap),
}

impl FieldValue {
    pub fn kind(&self) -> NodeType {
        match self {
            FieldValue::Common(common) => common.kind,
            FieldValue::List(list) => list.kind,
            FieldValue::Map(map) => map.kind,
        }
    }

    pub fn loc(&self) -> Loc {
        match self {
            FieldValue::Common(common) => common.loc,
            FieldValue::List(list) => list.loc,
            FieldValue::Map(map) => map.loc,
        }
    }

    pub fn as_common(&self) -> Option<&Common> {
        match self {
            FieldValue::Common(common) => Some(common),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match node_kind::<D::Error>(&value)? {
            NodeType::ConstList => decode_node(value).map(FieldValue::List),
            NodeType::ConstMap => decode_node(value).map(FieldValue::Map),
            kind if kind.is_scalar_value() => decode_node(value).map(FieldValue::Common),
            kind => Err(D::Error::custom(format!(
                "`{kind}` is not a constant value"
            ))),
        }
    }
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstList {
    pub kind: NodeType,
    pub loc: Loc,
    pub elements: Vec<FieldValue>,
}

/// `{k: v, ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstMap {
    pub kind: NodeType,
    pub loc: Loc,
    pub properties: Vec<PropertyAssignment>,
}

/// A single `key: value` entry of a constant map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAssignment {
    pub kind: NodeType,
    pub loc: Loc,
    pub name: FieldValue,
    pub value: FieldValue,
}

/// Parse an integer or hex literal as written in the source
pub fn parse_int_literal(text: &str) -> Option<i64> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_literal() {
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("-7"), Some(-7));
        assert_eq!(parse_int_literal("+3"), Some(3));
        assert_eq!(parse_int_literal("0x1F"), Some(31));
        assert_eq!(parse_int_literal("-0X10"), Some(-16));
        assert_eq!(parse_int_literal("1.5"), None);
        assert_eq!(parse_int_literal("99999999999999999999"), None);
    }

    #[test]
    fn test_value_dispatches_on_kind() {
        let json = r#"{"kind":"ConstList","loc":{"start":{"line":1,"column":1,"index":0},"end":{"line":1,"column":3,"index":2}},"elements":[]}"#;
        let value: FieldValue = serde_json::from_str(json).unwrap();
        assert!(matches!(value, FieldValue::List(ref list) if list.elements.is_empty()));
    }

    #[test]
    fn test_value_rejects_non_value_kind() {
        let json = r#"{"kind":"StructDefinition","value":"x","loc":{"start":{"line":1,"column":1,"index":0},"end":{"line":1,"column":2,"index":1}}}"#;
        let err = serde_json::from_str::<FieldValue>(json).unwrap_err();
        assert!(err.to_string().contains("not a constant value"));
    }
}
