//! Inline pieces: types, values, annotations, comments

use crate::thrift::ast::{Annotations, Comment, FieldType, FieldValue, NodeType};
use crate::thrift::error::{ErrorCode, IdlError, Result};
use crate::thrift::lexer::escape;

pub(super) fn type_text(field_type: &FieldType) -> Result<String> {
    match field_type {
        FieldType::Common(common) => Ok(match common.kind.keyword() {
            Some(keyword) => keyword.to_string(),
            None => common.value.clone(),
        }),
        FieldType::Collection(collection) => {
            let keyword = collection.kind.keyword().unwrap_or("list");
            let value_type = collection.value_type.as_deref().ok_or_else(|| {
                incomplete(format!("{keyword} type has no element type"))
            })?;
            Ok(format!("{keyword}<{}>", type_text(value_type)?))
        }
        FieldType::Map(map) => {
            let key_type = map
                .key_type
                .as_deref()
                .ok_or_else(|| incomplete("map type has no key type".to_string()))?;
            let value_type = map
                .value_type
                .as_deref()
                .ok_or_else(|| incomplete("map type has no value type".to_string()))?;
            Ok(format!(
                "map<{}, {}>",
                type_text(key_type)?,
                type_text(value_type)?
            ))
        }
    }
}

fn incomplete(message: String) -> IdlError {
    IdlError::serialization(ErrorCode::E200, message)
        .with_help("list and set types need `valueType`; map types need `keyType` and `valueType`")
}

pub(super) fn value_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Common(common) if common.kind == NodeType::StringLiteral => {
            quoted(&common.value)
        }
        FieldValue::Common(common) => common.value.clone(),
        FieldValue::List(list) => {
            let elements: Vec<String> = list.elements.iter().map(value_text).collect();
            format!("[{}]", elements.join(", "))
        }
        FieldValue::Map(map) => {
            let entries: Vec<String> = map
                .properties
                .iter()
                .map(|property| {
                    format!(
                        "{}: {}",
                        value_text(&property.name),
                        value_text(&property.value)
                    )
                })
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

pub(super) fn quoted(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

/// ` (a = "x", b = "y")`, or nothing
pub(super) fn annotations_text(annotations: Option<&Annotations>) -> String {
    let Some(annotations) = annotations else {
        return String::new();
    };
    let members: Vec<String> = annotations
        .members
        .iter()
        .map(|annotation| {
            format!(
                "{} = {}",
                annotation.name.value,
                quoted(&annotation.value.value)
            )
        })
        .collect();
    format!(" ({})", members.join(", "))
}

/// Comment text as written; bare text gets delimiters for its kind
pub(super) fn comment_text(comment: &Comment) -> String {
    let value = comment.value.as_str();
    match comment.kind {
        NodeType::CommentBlock if value.starts_with("/*") && value.ends_with("*/") => {
            value.to_string()
        }
        NodeType::CommentBlock => format!("/* {value} */"),
        _ if value.starts_with("//") || value.starts_with('#') => value.to_string(),
        _ => format!("// {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::ast::{CollectionType, Common, Loc, MapType};

    fn common(kind: NodeType, value: &str) -> Common {
        Common::new(kind, value, Loc::default())
    }

    #[test]
    fn test_base_types_use_keyword_spelling() {
        let field_type = FieldType::Common(common(NodeType::I64Keyword, "i64"));
        assert_eq!(type_text(&field_type).unwrap(), "i64");
        let reference = FieldType::Common(common(NodeType::Identifier, "shared.User"));
        assert_eq!(type_text(&reference).unwrap(), "shared.User");
    }

    #[test]
    fn test_incomplete_map_type() {
        let map = FieldType::Map(MapType {
            kind: NodeType::MapType,
            loc: Loc::default(),
            key_type: Some(Box::new(FieldType::Common(common(
                NodeType::StringKeyword,
                "string",
            )))),
            value_type: None,
        });
        let err = type_text(&map).unwrap_err();
        assert_eq!(err.kind(), "SerializationError");
        assert_eq!(err.code(), ErrorCode::E200);
        assert_eq!(err.message(), "map type has no value type");
    }

    #[test]
    fn test_incomplete_set_type() {
        let set = FieldType::Collection(CollectionType {
            kind: NodeType::SetType,
            loc: Loc::default(),
            value_type: None,
        });
        assert_eq!(
            type_text(&set).unwrap_err().message(),
            "set type has no element type"
        );
    }

    #[test]
    fn test_string_values_are_escaped() {
        let value = FieldValue::Common(common(NodeType::StringLiteral, "say \"hi\"\n"));
        assert_eq!(value_text(&value), r#""say \"hi\"\n""#);
    }

    #[test]
    fn test_comment_text() {
        let loc = Loc::default();
        assert_eq!(comment_text(&Comment::line("# hash", loc)), "# hash");
        assert_eq!(comment_text(&Comment::line("bare", loc)), "// bare");
        assert_eq!(comment_text(&Comment::block("/* b */", loc)), "/* b */");
        assert_eq!(comment_text(&Comment::block("b", loc)), "/* b */");
    }
}
