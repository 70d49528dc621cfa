//! Fields, field lists and field types

use super::Parser;
use crate::thrift::ast::{
    CollectionType, Common, Field, FieldType, Loc, MapType, NodeType, RequiredType,
};
use crate::thrift::error::{ErrorCode, Result};
use crate::thrift::lexer::{NumberKind, Token};
use std::collections::HashSet;

/// Largest explicit field ID (field IDs are 16-bit on the wire)
const MAX_FIELD_ID: i64 = i16::MAX as i64;

impl<'src> Parser<'src> {
    /// Parse `open field* close`, assigning implicit IDs `-1, -2, ...` to
    /// fields written without one
    pub(super) fn parse_field_list(&mut self, open: Token, close: Token) -> Result<Vec<Field>> {
        let (open_text, close_text) = match open {
            Token::LeftBrace => ("`{`", "a field or `}`"),
            _ => ("`(`", "a field or `)`"),
        };
        self.expect(open, open_text)?;

        let mut fields = Vec::new();
        let mut next_implicit = -1;
        let mut seen = HashSet::new();
        while !self.at(close) {
            if self.lookahead.is_none() {
                return Err(self.unexpected(close_text));
            }
            let field = self.parse_field(&mut next_implicit)?;
            if !field.is_implicit_id() {
                if let Some(id) = field.id() {
                    if !seen.insert(id) {
                        return Err(self
                            .error_at(
                                ErrorCode::E103,
                                format!(
                                    "field ID {id} is already used in this {}",
                                    list_name(open)
                                ),
                                field.field_id.loc,
                            )
                            .with_help("every field in a list needs its own ID"));
                    }
                }
            }
            fields.push(field);
            self.skip_separator()?;
        }
        self.expect(close, close_text)?;
        Ok(fields)
    }

    fn parse_field(&mut self, next_implicit: &mut i64) -> Result<Field> {
        let comments = self.take_comments();
        let start = self.start();

        let field_id = match self.peek() {
            Some(Token::Number(kind)) => {
                let token = self.bump()?;
                let id = match kind {
                    NumberKind::Integer => token.text.parse::<i64>().ok(),
                    _ => None,
                };
                if !id.is_some_and(|id| (1..=MAX_FIELD_ID).contains(&id)) {
                    return Err(self
                        .error_at(
                            ErrorCode::E102,
                            format!("invalid field ID `{}`", token.text),
                            token.loc,
                        )
                        .with_help("field IDs are decimal integers from 1 to 32767"));
                }
                self.expect(Token::Colon, "`:` after the field ID")?;
                Common::new(NodeType::FieldID, token.text, token.loc)
            }
            _ => {
                let id = *next_implicit;
                *next_implicit -= 1;
                Common::new(NodeType::ImplicitFieldID, id.to_string(), Loc::point(start))
            }
        };

        let required_type = if self.eat(Token::Required)?.is_some() {
            RequiredType::Required
        } else if self.eat(Token::Optional)?.is_some() {
            RequiredType::Optional
        } else {
            RequiredType::Default
        };

        let field_type = self.parse_field_type()?;
        let name = self.parse_name("a field name")?;
        let default_value = match self.eat(Token::Equals)? {
            Some(_) => Some(self.parse_const_value()?),
            None => None,
        };
        let annotations = self.parse_annotations()?;

        Ok(Field {
            kind: NodeType::FieldDefinition,
            loc: self.finish(start),
            name,
            field_id,
            field_type,
            required_type,
            default_value,
            comments,
            annotations,
        })
    }

    pub(super) fn parse_field_type(&mut self) -> Result<FieldType> {
        let Some(kind) = self.peek() else {
            return Err(self.unexpected("a type"));
        };
        match kind {
            Token::List | Token::Set | Token::Map => self.nested(Self::parse_container_type),
            Token::Identifier => {
                let token = self.bump()?;
                Ok(FieldType::Common(Common::identifier(token.text, token.loc)))
            }
            _ => match base_type_kind(kind) {
                Some(node_kind) => {
                    let token = self.bump()?;
                    Ok(FieldType::Common(Common::new(node_kind, token.text, token.loc)))
                }
                None => Err(self.unexpected("a type")),
            },
        }
    }

    /// `list<T>`, `set<T>` or `map<K, V>`
    fn parse_container_type(&mut self) -> Result<FieldType> {
        let keyword = self.bump()?;
        match keyword.kind {
            Token::List | Token::Set => {
                self.expect(Token::LeftAngle, "`<` and an element type")?;
                let value_type = self.parse_field_type()?;
                self.expect(Token::RightAngle, "`>` to close the element type")?;
                Ok(FieldType::Collection(CollectionType {
                    kind: match keyword.kind {
                        Token::List => NodeType::ListType,
                        _ => NodeType::SetType,
                    },
                    loc: self.finish(keyword.loc.start),
                    value_type: Some(Box::new(value_type)),
                }))
            }
            _ => {
                self.expect(Token::LeftAngle, "`<` and a key type")?;
                let key_type = self.parse_field_type()?;
                self.expect(Token::Comma, "`,` between the key and value types")?;
                let value_type = self.parse_field_type()?;
                self.expect(Token::RightAngle, "`>` to close the map type")?;
                Ok(FieldType::Map(MapType {
                    kind: NodeType::MapType,
                    loc: self.finish(keyword.loc.start),
                    key_type: Some(Box::new(key_type)),
                    value_type: Some(Box::new(value_type)),
                }))
            }
        }
    }

    /// A field type or `void`
    pub(super) fn parse_return_type(&mut self) -> Result<FieldType> {
        match self.eat(Token::Void)? {
            Some(token) => Ok(FieldType::Common(Common::new(
                NodeType::VoidKeyword,
                token.text,
                token.loc,
            ))),
            None => self.parse_field_type(),
        }
    }
}

fn base_type_kind(token: Token) -> Option<NodeType> {
    let kind = match token {
        Token::Bool => NodeType::BoolKeyword,
        Token::Byte => NodeType::ByteKeyword,
        Token::I8 => NodeType::I8Keyword,
        Token::I16 => NodeType::I16Keyword,
        Token::I32 => NodeType::I32Keyword,
        Token::I64 => NodeType::I64Keyword,
        Token::Double => NodeType::DoubleKeyword,
        Token::String => NodeType::StringKeyword,
        Token::Binary => NodeType::BinaryKeyword,
        _ => return None,
    };
    Some(kind)
}

fn list_name(open: Token) -> &'static str {
    match open {
        Token::LeftBrace => "struct",
        _ => "parameter list",
    }
}

#[cfg(test)]
mod tests {
    use crate::thrift::ast::{DocumentMember, NodeType, RequiredType, Struct};
    use crate::thrift::error::ErrorCode;
    use crate::thrift::parser::parse;

    fn first_struct(source: &str) -> Struct {
        match parse(source).unwrap().members.remove(0) {
            DocumentMember::Struct(node) => node,
            other => panic!("expected a struct, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_implicit_field_ids_count_down() {
        let user = first_struct("struct User { string name; 5: i32 age; bool admin }");
        let ids: Vec<(&str, NodeType)> = user
            .members
            .iter()
            .map(|field| (field.field_id.value.as_str(), field.field_id.kind))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("-1", NodeType::ImplicitFieldID),
                ("5", NodeType::FieldID),
                ("-2", NodeType::ImplicitFieldID),
            ]
        );
        assert_eq!(user.members[0].id(), Some(-1));
        assert!(user.members[0].field_id.loc.is_empty());
    }

    #[test]
    fn test_requiredness_and_defaults() {
        let user = first_struct(
            "struct User {\n  1: required string id\n  2: optional i32 age = 18\n  3: list<string> tags = []\n}",
        );
        assert_eq!(user.members[0].required_type, RequiredType::Required);
        assert_eq!(user.members[1].required_type, RequiredType::Optional);
        assert_eq!(
            user.members[1]
                .default_value
                .as_ref()
                .and_then(|value| value.as_common())
                .map(|value| value.value.as_str()),
            Some("18")
        );
        assert_eq!(user.members[2].required_type, RequiredType::Default);
    }

    #[test]
    fn test_keyword_field_names() {
        let node = first_struct("struct S { 1: string list, 2: i32 required }");
        assert_eq!(node.members[0].name.value, "list");
        assert_eq!(node.members[1].name.value, "required");
    }

    #[test]
    fn test_duplicate_field_id() {
        let err = parse("struct S {\n  1: i32 a\n  1: i32 b\n}").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E103);
        assert_eq!(err.message(), "field ID 1 is already used in this struct");
        let location = err.location().unwrap();
        assert_eq!((location.line, location.column), (3, 3));
    }

    #[test]
    fn test_invalid_field_ids() {
        for source in [
            "struct S { 0: i32 a }",
            "struct S { 0x1: i32 a }",
            "struct S { 40000: i32 a }",
            "struct S { -3: i32 a }",
        ] {
            let err = parse(source).unwrap_err();
            assert_eq!(err.code(), ErrorCode::E102, "{source}");
        }
    }

    #[test]
    fn test_unclosed_generic() {
        let err = parse("struct S { 1: list<i32 a }").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
        assert_eq!(
            err.message(),
            "expected `>` to close the element type, found `a`"
        );
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse("struct S {\n  1: i32 a\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E101);
        assert_eq!(err.message(), "expected a field or `}`, found end of input");
    }
}
