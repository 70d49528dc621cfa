//! Constant values and annotation blocks

use super::Parser;
use crate::thrift::ast::{
    Annotation, Annotations, Common, ConstList, ConstMap, FieldValue, Loc, NodeType,
    PropertyAssignment,
};
use crate::thrift::error::Result;
use crate::thrift::lexer::{NumberKind, Token};

impl<'src> Parser<'src> {
    /// A literal, constant reference, `[...]` list or `{k: v}` map
    pub(super) fn parse_const_value(&mut self) -> Result<FieldValue> {
        let Some(kind) = self.peek() else {
            return Err(self.unexpected("a constant value"));
        };
        let literal_kind = match kind {
            Token::StringLiteral => {
                let token = self.bump()?;
                return self.string_literal(token).map(FieldValue::Common);
            }
            Token::LeftBracket => return self.nested(Self::parse_const_list).map(FieldValue::List),
            Token::LeftBrace => return self.nested(Self::parse_const_map).map(FieldValue::Map),
            Token::Number(NumberKind::Integer) => NodeType::IntegerLiteral,
            Token::Number(NumberKind::Hex) => NodeType::HexLiteral,
            Token::Number(NumberKind::Double) => NodeType::DoubleLiteral,
            Token::True | Token::False => NodeType::BooleanLiteral,
            Token::Identifier => NodeType::Identifier,
            _ => return Err(self.unexpected("a constant value")),
        };
        let token = self.bump()?;
        Ok(FieldValue::Common(Common::new(
            literal_kind,
            token.text,
            token.loc,
        )))
    }

    fn parse_const_list(&mut self) -> Result<ConstList> {
        let start = self.bump()?.loc.start;
        let mut elements = Vec::new();
        while !self.at(Token::RightBracket) {
            if self.lookahead.is_none() {
                return Err(self.unexpected("a list element or `]`"));
            }
            elements.push(self.parse_const_value()?);
            self.skip_separator()?;
        }
        self.expect(Token::RightBracket, "`]`")?;
        Ok(ConstList {
            kind: NodeType::ConstList,
            loc: self.finish(start),
            elements,
        })
    }

    fn parse_const_map(&mut self) -> Result<ConstMap> {
        let start = self.bump()?.loc.start;
        let mut properties = Vec::new();
        while !self.at(Token::RightBrace) {
            if self.lookahead.is_none() {
                return Err(self.unexpected("a map entry or `}`"));
            }
            let name = self.parse_const_value()?;
            self.expect(Token::Colon, "`:` between the map key and value")?;
            let value = self.parse_const_value()?;
            properties.push(PropertyAssignment {
                kind: NodeType::PropertyAssignment,
                loc: Loc::new(name.loc().start, self.last_end),
                name,
                value,
            });
            self.skip_separator()?;
        }
        self.expect(Token::RightBrace, "`}`")?;
        Ok(ConstMap {
            kind: NodeType::ConstMap,
            loc: self.finish(start),
            properties,
        })
    }

    /// An optional trailing `(name = "value", ...)` block
    pub(super) fn parse_annotations(&mut self) -> Result<Option<Annotations>> {
        let Some(open) = self.eat(Token::LeftParen)? else {
            return Ok(None);
        };

        let mut members = Vec::new();
        while !self.at(Token::RightParen) {
            let name = self.parse_name("an annotation name or `)`")?;
            self.expect(Token::Equals, "`=` after the annotation name")
                .map_err(|err| err.with_help("annotations are written as `(name = \"value\")`"))?;
            let token = self.expect(Token::StringLiteral, "a quoted annotation value")?;
            let value = self.string_literal(token)?;
            members.push(Annotation {
                kind: NodeType::Annotation,
                loc: Loc::new(name.loc.start, self.last_end),
                name,
                value,
            });
            self.skip_separator()?;
        }
        self.expect(Token::RightParen, "`)`")?;

        Ok(Some(Annotations {
            kind: NodeType::Annotations,
            loc: self.finish(open.loc.start),
            members,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::thrift::ast::{DocumentMember, FieldValue, NodeType};
    use crate::thrift::error::ErrorCode;
    use crate::thrift::parser::parse;

    fn const_value(source: &str) -> FieldValue {
        match parse(source).unwrap().members.remove(0) {
            DocumentMember::Const(node) => node.initializer,
            other => panic!("expected a const, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_scalar_literals_keep_source_text() {
        for (source, kind, text) in [
            ("const i32 A = -007", NodeType::IntegerLiteral, "-007"),
            ("const i64 B = 0xFF", NodeType::HexLiteral, "0xFF"),
            ("const double C = 1.50e3", NodeType::DoubleLiteral, "1.50e3"),
            ("const bool D = true", NodeType::BooleanLiteral, "true"),
            ("const Color E = Color.RED", NodeType::Identifier, "Color.RED"),
        ] {
            let value = const_value(source);
            let common = value.as_common().unwrap();
            assert_eq!((common.kind, common.value.as_str()), (kind, text), "{source}");
        }
    }

    #[test]
    fn test_string_literal_is_unescaped() {
        let value = const_value(r#"const string S = 'it\'s "here"\n'"#);
        assert_eq!(value.as_common().unwrap().value, "it's \"here\"\n");
    }

    #[test]
    fn test_nested_lists_and_maps() {
        let value = const_value("const list<map<string, list<i32>>> X = [{\"a\": [1; 2]}, {}]");
        let FieldValue::List(list) = value else {
            panic!("expected a list");
        };
        assert_eq!(list.elements.len(), 2);
        let FieldValue::Map(map) = &list.elements[0] else {
            panic!("expected a map");
        };
        assert_eq!(map.properties[0].name.kind(), NodeType::StringLiteral);
        assert!(matches!(&map.properties[0].value, FieldValue::List(inner) if inner.elements.len() == 2));
    }

    #[test]
    fn test_annotations_keep_order() {
        let document =
            parse("struct S {\n  1: i32 x (a = \"1\"; b.c = \"2\",)\n} (final = \"true\")").unwrap();
        let DocumentMember::Struct(node) = &document.members[0] else {
            panic!("expected a struct");
        };
        let field_annotations = node.members[0].annotations.as_ref().unwrap();
        let names: Vec<&str> = field_annotations
            .members
            .iter()
            .map(|a| a.name.value.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b.c"]);
        assert_eq!(field_annotations.get("b.c"), Some("2"));
        assert_eq!(node.annotations.as_ref().and_then(|a| a.get("final")), Some("true"));
    }

    #[test]
    fn test_annotation_value_must_be_string() {
        let err = parse("typedef i32 T (a = 1)").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
        assert_eq!(err.message(), "expected a quoted annotation value, found `1`");
    }

    #[test]
    fn test_unterminated_list() {
        let err = parse("const list<i32> L = [1, 2").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E101);
    }
}
