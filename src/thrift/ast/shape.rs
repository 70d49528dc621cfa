//! Node kind and text checks
//!
//! Rust types fix the structure of a tree but not the `kind` string each node
//! carries, so a tree built by hand or decoded from JSON can hold a kind that
//! is wrong for its position (an `Identifier` where a field type keyword or
//! list is expected, a `Struct` tagged `ServiceDefinition`, ...). Such a tree
//! can also carry text the writer would emit verbatim but that does not read
//! back as the same node: a name with spaces, a line comment spanning two
//! lines, a `loc` that ends before it starts. The writer and the JSON decoder
//! both run [`check_document`] before trusting a tree.

use super::{
    Annotations, Comment, Common, Document, DocumentMember, Field, FieldType, FieldValue,
    Function, Loc, NodeType, Struct,
};
use crate::thrift::lexer::{tokenize_all, NumberKind, Token};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    /// Dotted path of the offending node, e.g. `members[1].fieldType`
    pub path: String,
    pub problem: Problem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A kind the position does not admit
    Kind {
        found: NodeType,
        expected: &'static str,
    },
    /// Text that would not read back as the same node
    Text {
        found: String,
        expected: &'static str,
    },
    /// `loc.start` lies after `loc.end`
    InvertedLoc,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Problem::Kind { found, expected } => write!(
                f,
                "found `{found}` at `{}` where {expected} was expected",
                self.path
            ),
            Problem::Text { found, expected } => write!(
                f,
                "found {found:?} at `{}` where {expected} was expected",
                self.path
            ),
            Problem::InvertedLoc => write!(f, "`{}.loc` ends before it starts", self.path),
        }
    }
}

impl std::error::Error for ShapeError {}

type Check = Result<(), ShapeError>;

fn expect(found: NodeType, ok: bool, path: &str, expected: &'static str) -> Check {
    if ok {
        Ok(())
    } else {
        Err(ShapeError {
            path: path.to_string(),
            problem: Problem::Kind { found, expected },
        })
    }
}

fn expect_kind(found: NodeType, wanted: NodeType, path: &str, expected: &'static str) -> Check {
    expect(found, found == wanted, path, expected)
}

fn expect_text(found: &str, ok: bool, path: &str, expected: &'static str) -> Check {
    if ok {
        Ok(())
    } else {
        Err(ShapeError {
            path: path.to_string(),
            problem: Problem::Text {
                found: found.to_string(),
                expected,
            },
        })
    }
}

fn check_loc(loc: Loc, path: &str) -> Check {
    if loc.start.index <= loc.end.index {
        Ok(())
    } else {
        Err(ShapeError {
            path: path.to_string(),
            problem: Problem::InvertedLoc,
        })
    }
}

/// `text` lexes to exactly one token, spelled exactly `text`, that `accept` takes
fn lexes_as(text: &str, accept: impl Fn(Token) -> bool) -> bool {
    match tokenize_all(text) {
        Ok(tokens) => {
            matches!(tokens.as_slice(), [token] if token.text == text && accept(token.kind))
        }
        Err(_) => false,
    }
}

/// Check every node in the document against its position
pub fn check_document(document: &Document) -> Check {
    expect_kind(
        document.kind,
        NodeType::ThriftDocument,
        "$",
        "a ThriftDocument",
    )?;
    check_loc(document.loc, "$")?;
    for (i, member) in document.members.iter().enumerate() {
        check_member(member, &format!("members[{i}]"))?;
    }
    check_comments(&document.trailing_comments, "trailingComments")
}

fn check_member(member: &DocumentMember, path: &str) -> Check {
    check_loc(member.loc(), path)?;
    check_comments(member.comments(), &format!("{path}.comments"))?;
    if let Some(annotations) = member.annotations() {
        check_annotations(annotations, &format!("{path}.annotations"))?;
    }
    match member {
        DocumentMember::Namespace(node) => {
            expect_kind(node.kind, NodeType::NamespaceDefinition, path, "a namespace")?;
            check_scope(&node.scope, &format!("{path}.scope"))?;
            check_name(&node.name, &format!("{path}.name"))
        }
        DocumentMember::Include(node) => {
            expect_kind(node.kind, NodeType::IncludeDefinition, path, "an include")?;
            let path = format!("{path}.path");
            expect_kind(node.path.kind, NodeType::StringLiteral, &path, "a string literal")?;
            check_loc(node.path.loc, &path)
        }
        DocumentMember::Const(node) => {
            expect_kind(node.kind, NodeType::ConstDefinition, path, "a const")?;
            check_name(&node.name, &format!("{path}.name"))?;
            check_type(&node.field_type, false, &format!("{path}.fieldType"))?;
            check_value(&node.initializer, &format!("{path}.initializer"))
        }
        DocumentMember::Typedef(node) => {
            expect_kind(node.kind, NodeType::TypedefDefinition, path, "a typedef")?;
            check_name(&node.name, &format!("{path}.name"))?;
            check_type(&node.definition_type, false, &format!("{path}.definitionType"))
        }
        DocumentMember::Enum(node) => {
            expect_kind(node.kind, NodeType::EnumDefinition, path, "an enum")?;
            check_name(&node.name, &format!("{path}.name"))?;
            for (i, member) in node.members.iter().enumerate() {
                let path = format!("{path}.members[{i}]");
                expect_kind(member.kind, NodeType::EnumMember, &path, "an enum member")?;
                check_loc(member.loc, &path)?;
                check_name(&member.name, &format!("{path}.name"))?;
                if let Some(initializer) = &member.initializer {
                    let path = format!("{path}.initializer");
                    expect(
                        initializer.kind,
                        matches!(
                            initializer.kind,
                            NodeType::IntegerLiteral | NodeType::HexLiteral
                        ),
                        &path,
                        "an integer literal",
                    )?;
                    check_literal(initializer, &path)?;
                }
                check_comments(&member.comments, &format!("{path}.comments"))?;
                if let Some(annotations) = &member.annotations {
                    check_annotations(annotations, &format!("{path}.annotations"))?;
                }
            }
            Ok(())
        }
        DocumentMember::Struct(node) => check_struct(node, NodeType::StructDefinition, path),
        DocumentMember::Union(node) => check_struct(node, NodeType::UnionDefinition, path),
        DocumentMember::Exception(node) => {
            check_struct(node, NodeType::ExceptionDefinition, path)
        }
        DocumentMember::Service(node) => {
            expect_kind(node.kind, NodeType::ServiceDefinition, path, "a service")?;
            check_name(&node.name, &format!("{path}.name"))?;
            if let Some(extends) = &node.extends {
                check_name(extends, &format!("{path}.extends"))?;
            }
            for (i, function) in node.members.iter().enumerate() {
                check_function(function, &format!("{path}.members[{i}]"))?;
            }
            Ok(())
        }
    }
}

fn check_struct(node: &Struct, wanted: NodeType, path: &str) -> Check {
    expect_kind(node.kind, wanted, path, "a struct, union or exception matching its variant")?;
    check_name(&node.name, &format!("{path}.name"))?;
    check_fields(&node.members, &format!("{path}.members"))
}

fn check_function(function: &Function, path: &str) -> Check {
    expect_kind(function.kind, NodeType::FunctionDefinition, path, "a function")?;
    check_loc(function.loc, path)?;
    check_name(&function.name, &format!("{path}.name"))?;
    check_type(&function.return_type, true, &format!("{path}.returnType"))?;
    check_fields(&function.params, &format!("{path}.params"))?;
    if let Some(throws) = &function.throws {
        check_fields(throws, &format!("{path}.throws"))?;
    }
    check_comments(&function.comments, &format!("{path}.comments"))?;
    if let Some(annotations) = &function.annotations {
        check_annotations(annotations, &format!("{path}.annotations"))?;
    }
    Ok(())
}

fn check_fields(fields: &[Field], path: &str) -> Check {
    for (i, field) in fields.iter().enumerate() {
        let path = format!("{path}[{i}]");
        expect_kind(field.kind, NodeType::FieldDefinition, &path, "a field")?;
        check_loc(field.loc, &path)?;
        check_name(&field.name, &format!("{path}.name"))?;
        let id_path = format!("{path}.fieldID");
        expect(
            field.field_id.kind,
            matches!(
                field.field_id.kind,
                NodeType::FieldID | NodeType::ImplicitFieldID
            ),
            &id_path,
            "a field ID",
        )?;
        check_loc(field.field_id.loc, &id_path)?;
        if field.field_id.kind == NodeType::FieldID {
            expect_text(
                &field.field_id.value,
                lexes_as(&field.field_id.value, |token| {
                    token == Token::Number(NumberKind::Integer)
                }),
                &id_path,
                "an integer field ID",
            )?;
        }
        check_type(&field.field_type, false, &format!("{path}.fieldType"))?;
        if let Some(value) = &field.default_value {
            check_value(value, &format!("{path}.defaultValue"))?;
        }
        check_comments(&field.comments, &format!("{path}.comments"))?;
        if let Some(annotations) = &field.annotations {
            check_annotations(annotations, &format!("{path}.annotations"))?;
        }
    }
    Ok(())
}

fn check_type(field_type: &FieldType, allow_void: bool, path: &str) -> Check {
    check_loc(field_type.loc(), path)?;
    match field_type {
        FieldType::Common(common) => {
            expect(
                common.kind,
                common.kind.is_common_type()
                    || (allow_void && common.kind == NodeType::VoidKeyword),
                path,
                "a base type or type name",
            )?;
            // Keyword types are written from their kind; references verbatim
            if common.kind == NodeType::Identifier {
                check_reference(common, path)?;
            }
            Ok(())
        }
        FieldType::Collection(collection) => {
            expect(
                collection.kind,
                matches!(collection.kind, NodeType::ListType | NodeType::SetType),
                path,
                "a list or set type",
            )?;
            match &collection.value_type {
                Some(value_type) => check_type(value_type, false, &format!("{path}.valueType")),
                None => Ok(()),
            }
        }
        FieldType::Map(map) => {
            expect_kind(map.kind, NodeType::MapType, path, "a map type")?;
            if let Some(key_type) = &map.key_type {
                check_type(key_type, false, &format!("{path}.keyType"))?;
            }
            match &map.value_type {
                Some(value_type) => check_type(value_type, false, &format!("{path}.valueType")),
                None => Ok(()),
            }
        }
    }
}

fn check_value(value: &FieldValue, path: &str) -> Check {
    check_loc(value.loc(), path)?;
    match value {
        FieldValue::Common(common) => {
            expect(
                common.kind,
                common.kind.is_scalar_value(),
                path,
                "a literal or constant reference",
            )?;
            check_literal(common, path)
        }
        FieldValue::List(list) => {
            expect_kind(list.kind, NodeType::ConstList, path, "a constant list")?;
            for (i, element) in list.elements.iter().enumerate() {
                check_value(element, &format!("{path}.elements[{i}]"))?;
            }
            Ok(())
        }
        FieldValue::Map(map) => {
            expect_kind(map.kind, NodeType::ConstMap, path, "a constant map")?;
            for (i, property) in map.properties.iter().enumerate() {
                let path = format!("{path}.properties[{i}]");
                expect_kind(
                    property.kind,
                    NodeType::PropertyAssignment,
                    &path,
                    "a map entry",
                )?;
                check_loc(property.loc, &path)?;
                check_value(&property.name, &format!("{path}.name"))?;
                check_value(&property.value, &format!("{path}.value"))?;
            }
            Ok(())
        }
    }
}

/// Literal text must lex back as the literal its kind names; strings are re-escaped
fn check_literal(literal: &Common, path: &str) -> Check {
    let (ok, expected) = match literal.kind {
        NodeType::IntegerLiteral => (
            lexes_as(&literal.value, |token| {
                token == Token::Number(NumberKind::Integer)
            }),
            "an integer",
        ),
        NodeType::HexLiteral => (
            lexes_as(&literal.value, |token| token == Token::Number(NumberKind::Hex)),
            "a hex integer",
        ),
        NodeType::DoubleLiteral => (
            lexes_as(&literal.value, |token| {
                token == Token::Number(NumberKind::Double)
            }),
            "a double",
        ),
        NodeType::BooleanLiteral => (
            lexes_as(&literal.value, |token| {
                matches!(token, Token::True | Token::False)
            }),
            "`true` or `false`",
        ),
        NodeType::Identifier => return check_reference(literal, path),
        _ => (true, ""),
    };
    expect_text(&literal.value, ok, path, expected)
}

/// A declaration name: an identifier, or a keyword used as one
fn check_name(name: &Common, path: &str) -> Check {
    expect_kind(name.kind, NodeType::Identifier, path, "an identifier")?;
    check_loc(name.loc, path)?;
    expect_text(
        &name.value,
        lexes_as(&name.value, |token| {
            token == Token::Identifier || token.is_keyword()
        }),
        path,
        "a name",
    )
}

fn check_scope(scope: &Common, path: &str) -> Check {
    expect_kind(scope.kind, NodeType::Identifier, path, "an identifier")?;
    check_loc(scope.loc, path)?;
    expect_text(
        &scope.value,
        lexes_as(&scope.value, |token| {
            token == Token::Identifier || token == Token::Star || token.is_keyword()
        }),
        path,
        "a namespace scope",
    )
}

/// A reference to a named type or constant
fn check_reference(reference: &Common, path: &str) -> Check {
    expect_kind(reference.kind, NodeType::Identifier, path, "an identifier")?;
    check_loc(reference.loc, path)?;
    expect_text(
        &reference.value,
        lexes_as(&reference.value, |token| token == Token::Identifier),
        path,
        "a dotted identifier",
    )
}

fn check_comments(comments: &[Comment], path: &str) -> Check {
    for (i, comment) in comments.iter().enumerate() {
        let path = format!("{path}[{i}]");
        expect(comment.kind, comment.kind.is_comment(), &path, "a comment")?;
        check_loc(comment.loc, &path)?;
        let value = comment.value.as_str();
        if comment.kind == NodeType::CommentLine {
            expect_text(
                value,
                !value.contains(['\n', '\r']),
                &path,
                "a single-line comment",
            )?;
        } else {
            let closed_only_at_end = match value
                .strip_prefix("/*")
                .and_then(|rest| rest.strip_suffix("*/"))
            {
                Some(body) => !body.contains("*/"),
                None => !value.starts_with("/*") && !value.contains("*/"),
            };
            expect_text(
                value,
                closed_only_at_end,
                &path,
                "a block comment closed only at its end",
            )?;
        }
    }
    Ok(())
}

fn check_annotations(annotations: &Annotations, path: &str) -> Check {
    expect_kind(annotations.kind, NodeType::Annotations, path, "an annotation list")?;
    check_loc(annotations.loc, path)?;
    for (i, annotation) in annotations.members.iter().enumerate() {
        let path = format!("{path}.members[{i}]");
        expect_kind(annotation.kind, NodeType::Annotation, &path, "an annotation")?;
        check_loc(annotation.loc, &path)?;
        check_name(&annotation.name, &format!("{path}.name"))?;
        let value_path = format!("{path}.value");
        expect_kind(
            annotation.value.kind,
            NodeType::StringLiteral,
            &value_path,
            "a string literal",
        )?;
        check_loc(annotation.value.loc, &value_path)?;
    }
    Ok(())
}
