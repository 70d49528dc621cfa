//! Canonical IDL writer
//!
//! Renders a [`Document`] back to Thrift IDL in one fixed layout: two-space
//! indentation, one declaration per line, comments on their own lines before
//! the node that owns them. Output is built in a private buffer and only
//! returned when the whole tree rendered, so a failure never yields partial
//! text.

mod definitions;
mod fragments;

use crate::thrift::ast::shape::check_document;
use crate::thrift::ast::{Comment, Document, DocumentMember, NodeType};
use crate::thrift::error::{ErrorCode, IdlError, Result};
use log::debug;
use std::fmt::Write as _;

const INDENT: &str = "  ";

/// Render a document as canonical Thrift IDL
pub fn write(document: &Document) -> Result<String> {
    Writer::new().write(document)
}

#[derive(Debug, Default)]
pub struct Writer {
    out: String,
    indent: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(mut self, document: &Document) -> Result<String> {
        check_document(document).map_err(|err| {
            IdlError::serialization(ErrorCode::E201, err.to_string())
                .with_help("each node must fit its position and read back as written")
        })?;

        let mut previous: Option<NodeType> = None;
        for member in &document.members {
            if let Some(previous) = previous {
                if !groups_with(previous, member) {
                    self.out.push('\n');
                }
            }
            self.write_member(member)?;
            previous = Some(member.kind());
        }

        if !document.trailing_comments.is_empty() {
            if previous.is_some() {
                self.out.push('\n');
            }
            self.write_comments(&document.trailing_comments)?;
        }

        debug!(bytes = self.out.len(); "Wrote Thrift document");
        Ok(self.out)
    }

    fn write_member(&mut self, member: &DocumentMember) -> Result<()> {
        self.write_comments(member.comments())?;
        match member {
            DocumentMember::Namespace(node) => self.write_namespace(node),
            DocumentMember::Include(node) => self.write_include(node),
            DocumentMember::Const(node) => self.write_const(node),
            DocumentMember::Typedef(node) => self.write_typedef(node),
            DocumentMember::Enum(node) => self.write_enum(node),
            DocumentMember::Struct(node)
            | DocumentMember::Union(node)
            | DocumentMember::Exception(node) => self.write_struct(node),
            DocumentMember::Service(node) => self.write_service(node),
        }
    }

    fn write_comments(&mut self, comments: &[Comment]) -> Result<()> {
        for comment in comments {
            self.start_line();
            writeln!(self.out, "{}", fragments::comment_text(comment))?;
        }
        Ok(())
    }

    fn start_line(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }
}

/// Consecutive namespaces, and consecutive includes, stay on adjacent lines
fn groups_with(previous: NodeType, member: &DocumentMember) -> bool {
    previous == member.kind()
        && matches!(
            previous,
            NodeType::NamespaceDefinition | NodeType::IncludeDefinition
        )
}
