//! Top-level definitions

use super::Parser;
use crate::thrift::ast::{
    Comment, Common, Const, DocumentMember, Enum, EnumMember, Function, Include, Namespace,
    NodeType, Service, Struct, Typedef,
};
use crate::thrift::error::{ErrorCode, Result};
use crate::thrift::lexer::{NumberKind, Token};
use log::trace;

impl<'src> Parser<'src> {
    pub(super) fn parse_definition(&mut self) -> Result<DocumentMember> {
        let comments = self.take_comments();
        let member = match self.peek() {
            Some(Token::Namespace) => DocumentMember::Namespace(self.parse_namespace(comments)?),
            Some(Token::Include) => DocumentMember::Include(self.parse_include(comments)?),
            Some(Token::Const) => DocumentMember::Const(self.parse_const(comments)?),
            Some(Token::Typedef) => DocumentMember::Typedef(self.parse_typedef(comments)?),
            Some(Token::Enum) => DocumentMember::Enum(self.parse_enum(comments)?),
            Some(Token::Struct) => {
                DocumentMember::Struct(self.parse_struct(NodeType::StructDefinition, comments)?)
            }
            Some(Token::Union) => {
                DocumentMember::Union(self.parse_struct(NodeType::UnionDefinition, comments)?)
            }
            Some(Token::Exception) => DocumentMember::Exception(
                self.parse_struct(NodeType::ExceptionDefinition, comments)?,
            ),
            Some(Token::Service) => DocumentMember::Service(self.parse_service(comments)?),
            _ => {
                return Err(self.unexpected("a definition").with_help(
                    "top-level definitions start with namespace, include, const, typedef, \
                     enum, struct, union, exception or service",
                ))
            }
        };
        self.skip_separator()?;

        trace!(
            "parsed {} {}",
            member.kind(),
            member.name().map(Common::as_str).unwrap_or("")
        );
        Ok(member)
    }

    fn parse_namespace(&mut self, comments: Vec<Comment>) -> Result<Namespace> {
        let start = self.bump()?.loc.start;
        let scope = match self.eat(Token::Star)? {
            Some(star) => Common::identifier(star.text, star.loc),
            None => self.parse_name("a namespace scope such as `java` or `*`")?,
        };
        let name = self.parse_name("a namespace name")?;
        let annotations = self.parse_annotations()?;
        Ok(Namespace {
            kind: NodeType::NamespaceDefinition,
            loc: self.finish(start),
            scope,
            name,
            comments,
            annotations,
        })
    }

    fn parse_include(&mut self, comments: Vec<Comment>) -> Result<Include> {
        let start = self.bump()?.loc.start;
        let token = self
            .expect(Token::StringLiteral, "a quoted file path")
            .map_err(|err| err.with_help("write includes as `include \"shared.thrift\"`"))?;
        let path = self.string_literal(token)?;
        let annotations = self.parse_annotations()?;
        Ok(Include {
            kind: NodeType::IncludeDefinition,
            loc: self.finish(start),
            path,
            comments,
            annotations,
        })
    }

    fn parse_const(&mut self, comments: Vec<Comment>) -> Result<Const> {
        let start = self.bump()?.loc.start;
        let field_type = self.parse_field_type()?;
        let name = self.parse_name("a constant name")?;
        self.expect(Token::Equals, "`=` followed by the constant value")?;
        let initializer = self.parse_const_value()?;
        let annotations = self.parse_annotations()?;
        Ok(Const {
            kind: NodeType::ConstDefinition,
            loc: self.finish(start),
            name,
            field_type,
            initializer,
            comments,
            annotations,
        })
    }

    fn parse_typedef(&mut self, comments: Vec<Comment>) -> Result<Typedef> {
        let start = self.bump()?.loc.start;
        let definition_type = self.parse_field_type()?;
        let name = self.parse_name("a typedef name")?;
        let annotations = self.parse_annotations()?;
        Ok(Typedef {
            kind: NodeType::TypedefDefinition,
            loc: self.finish(start),
            name,
            definition_type,
            comments,
            annotations,
        })
    }

    fn parse_enum(&mut self, comments: Vec<Comment>) -> Result<Enum> {
        let start = self.bump()?.loc.start;
        let name = self.parse_name("an enum name")?;
        self.expect(Token::LeftBrace, "`{` to open the enum body")?;

        let mut members = Vec::new();
        while !self.at(Token::RightBrace) {
            members.push(self.parse_enum_member()?);
            self.skip_separator()?;
        }
        self.expect(Token::RightBrace, "`}`")?;

        let annotations = self.parse_annotations()?;
        Ok(Enum {
            kind: NodeType::EnumDefinition,
            loc: self.finish(start),
            name,
            members,
            comments,
            annotations,
        })
    }

    fn parse_enum_member(&mut self) -> Result<EnumMember> {
        let comments = self.take_comments();
        let name = self.parse_name("an enum member name or `}`")?;
        let start = name.loc.start;

        let initializer = match self.eat(Token::Equals)? {
            Some(_) => {
                let kind = match self.peek() {
                    Some(Token::Number(NumberKind::Integer)) => NodeType::IntegerLiteral,
                    Some(Token::Number(NumberKind::Hex)) => NodeType::HexLiteral,
                    Some(_) => {
                        return Err(self
                            .unexpected("an integer enum value")
                            .with_code(ErrorCode::E104)
                            .with_help("enum values are integer literals such as `1` or `0x10`"))
                    }
                    None => return Err(self.unexpected("an integer enum value")),
                };
                let token = self.bump()?;
                Some(Common::new(kind, token.text, token.loc))
            }
            None => None,
        };

        let annotations = self.parse_annotations()?;
        Ok(EnumMember {
            kind: NodeType::EnumMember,
            loc: self.finish(start),
            name,
            initializer,
            comments,
            annotations,
        })
    }

    fn parse_struct(&mut self, kind: NodeType, comments: Vec<Comment>) -> Result<Struct> {
        let keyword = self.bump()?;
        let expected = match kind {
            NodeType::ExceptionDefinition => "an exception name".to_string(),
            _ => format!("a {} name", keyword.text),
        };
        let name = self.parse_name(&expected)?;
        let members = self.parse_field_list(Token::LeftBrace, Token::RightBrace)?;
        let annotations = self.parse_annotations()?;
        Ok(Struct {
            kind,
            loc: self.finish(keyword.loc.start),
            name,
            members,
            comments,
            annotations,
        })
    }

    fn parse_service(&mut self, comments: Vec<Comment>) -> Result<Service> {
        let start = self.bump()?.loc.start;
        let name = self.parse_name("a service name")?;
        let extends = match self.eat(Token::Extends)? {
            Some(_) => Some(self.parse_name("the name of the parent service")?),
            None => None,
        };
        self.expect(Token::LeftBrace, "`{` to open the service body")?;

        let mut members = Vec::new();
        while !self.at(Token::RightBrace) {
            members.push(self.parse_function()?);
            self.skip_separator()?;
        }
        self.expect(Token::RightBrace, "`}`")?;

        let annotations = self.parse_annotations()?;
        Ok(Service {
            kind: NodeType::ServiceDefinition,
            loc: self.finish(start),
            name,
            extends,
            members,
            comments,
            annotations,
        })
    }

    fn parse_function(&mut self) -> Result<Function> {
        let comments = self.take_comments();
        let start = self.start();
        let oneway = self.eat(Token::Oneway)?.is_some();
        let return_type = self.parse_return_type()?;
        let name = self.parse_name("a function name")?;
        let params = self.parse_field_list(Token::LeftParen, Token::RightParen)?;
        let throws = match self.eat(Token::Throws)? {
            Some(_) => Some(self.parse_field_list(Token::LeftParen, Token::RightParen)?),
            None => None,
        };
        let annotations = self.parse_annotations()?;
        Ok(Function {
            kind: NodeType::FunctionDefinition,
            loc: self.finish(start),
            name,
            return_type,
            params,
            throws,
            oneway,
            comments,
            annotations,
        })
    }
}
