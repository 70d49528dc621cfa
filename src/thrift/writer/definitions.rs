//! Definition layouts

use super::fragments::{annotations_text, quoted, type_text, value_text};
use super::Writer;
use crate::thrift::ast::{Const, Enum, Field, Function, Include, Namespace, Service, Struct, Typedef};
use crate::thrift::error::Result;
use std::fmt::Write as _;

impl Writer {
    pub(super) fn write_namespace(&mut self, node: &Namespace) -> Result<()> {
        writeln!(
            self.out,
            "namespace {} {}{}",
            node.scope.value,
            node.name.value,
            annotations_text(node.annotations.as_ref())
        )?;
        Ok(())
    }

    pub(super) fn write_include(&mut self, node: &Include) -> Result<()> {
        writeln!(
            self.out,
            "include {}{}",
            quoted(&node.path.value),
            annotations_text(node.annotations.as_ref())
        )?;
        Ok(())
    }

    pub(super) fn write_const(&mut self, node: &Const) -> Result<()> {
        writeln!(
            self.out,
            "const {} {} = {}{}",
            type_text(&node.field_type)?,
            node.name.value,
            value_text(&node.initializer),
            annotations_text(node.annotations.as_ref())
        )?;
        Ok(())
    }

    pub(super) fn write_typedef(&mut self, node: &Typedef) -> Result<()> {
        writeln!(
            self.out,
            "typedef {} {}{}",
            type_text(&node.definition_type)?,
            node.name.value,
            annotations_text(node.annotations.as_ref())
        )?;
        Ok(())
    }

    pub(super) fn write_enum(&mut self, node: &Enum) -> Result<()> {
        write!(self.out, "enum {} {{", node.name.value)?;
        if !node.members.is_empty() {
            self.out.push('\n');
            self.indent += 1;
            for member in &node.members {
                self.write_comments(&member.comments)?;
                self.start_line();
                self.out.push_str(&member.name.value);
                if let Some(initializer) = &member.initializer {
                    write!(self.out, " = {}", initializer.value)?;
                }
                writeln!(self.out, "{},", annotations_text(member.annotations.as_ref()))?;
            }
            self.indent -= 1;
        }
        writeln!(self.out, "}}{}", annotations_text(node.annotations.as_ref()))?;
        Ok(())
    }

    pub(super) fn write_struct(&mut self, node: &Struct) -> Result<()> {
        let keyword = node.kind.keyword().unwrap_or("struct");
        write!(self.out, "{keyword} {} {{", node.name.value)?;
        if !node.members.is_empty() {
            self.out.push('\n');
            self.indent += 1;
            for field in &node.members {
                self.write_comments(&field.comments)?;
                self.start_line();
                writeln!(self.out, "{}", field_text(field)?)?;
            }
            self.indent -= 1;
        }
        writeln!(self.out, "}}{}", annotations_text(node.annotations.as_ref()))?;
        Ok(())
    }

    pub(super) fn write_service(&mut self, node: &Service) -> Result<()> {
        write!(self.out, "service {}", node.name.value)?;
        if let Some(extends) = &node.extends {
            write!(self.out, " extends {}", extends.value)?;
        }
        self.out.push_str(" {");
        if !node.members.is_empty() {
            self.out.push('\n');
            self.indent += 1;
            for function in &node.members {
                self.write_function(function)?;
            }
            self.indent -= 1;
        }
        writeln!(self.out, "}}{}", annotations_text(node.annotations.as_ref()))?;
        Ok(())
    }

    fn write_function(&mut self, function: &Function) -> Result<()> {
        self.write_comments(&function.comments)?;
        self.start_line();
        if function.oneway {
            self.out.push_str("oneway ");
        }
        write!(
            self.out,
            "{} {}",
            type_text(&function.return_type)?,
            function.name.value
        )?;
        self.write_field_list(&function.params)?;
        if let Some(throws) = &function.throws {
            self.out.push_str(" throws ");
            self.write_field_list(throws)?;
        }
        writeln!(self.out, "{}", annotations_text(function.annotations.as_ref()))?;
        Ok(())
    }

    /// `(a, b)` on one line, or one field per line when any field has comments
    fn write_field_list(&mut self, fields: &[Field]) -> Result<()> {
        if fields.iter().all(|field| field.comments.is_empty()) {
            let fields = fields.iter().map(field_text).collect::<Result<Vec<_>>>()?;
            write!(self.out, "({})", fields.join(", "))?;
            return Ok(());
        }

        self.out.push_str("(\n");
        self.indent += 1;
        for (i, field) in fields.iter().enumerate() {
            self.write_comments(&field.comments)?;
            self.start_line();
            self.out.push_str(&field_text(field)?);
            if i + 1 < fields.len() {
                self.out.push(',');
            }
            self.out.push('\n');
        }
        self.indent -= 1;
        self.start_line();
        self.out.push(')');
        Ok(())
    }
}

/// `[id: ][required |optional ]type name[ = value][ (annotations)]`
fn field_text(field: &Field) -> Result<String> {
    let mut text = String::new();
    if !field.is_implicit_id() {
        write!(text, "{}: ", field.field_id.value)?;
    }
    if let Some(keyword) = field.required_type.keyword() {
        write!(text, "{keyword} ")?;
    }
    write!(text, "{} {}", type_text(&field.field_type)?, field.name.value)?;
    if let Some(value) = &field.default_value {
        write!(text, " = {}", value_text(value))?;
    }
    text.push_str(&annotations_text(field.annotations.as_ref()));
    Ok(text)
}

#[cfg(test)]
mod tests {
    use crate::thrift::parser::parse;
    use crate::thrift::writer::write;

    fn canonical(source: &str) -> String {
        write(&parse(source).unwrap()).unwrap()
    }

    #[test]
    fn test_struct_layout() {
        assert_eq!(
            canonical("struct User{1:required string id;2:optional i32 age=18,string nick}"),
            "struct User {\n  1: required string id\n  2: optional i32 age = 18\n  string nick\n}\n"
        );
    }

    #[test]
    fn test_empty_bodies() {
        assert_eq!(
            canonical("struct A {} enum B {} service C {}"),
            "struct A {}\n\nenum B {}\n\nservice C {}\n"
        );
    }

    #[test]
    fn test_namespaces_and_includes_group_together() {
        assert_eq!(
            canonical("namespace java a.b namespace py a include \"x.thrift\" include \"y.thrift\" typedef i32 Id"),
            "namespace java a.b\nnamespace py a\n\ninclude \"x.thrift\"\ninclude \"y.thrift\"\n\ntypedef i32 Id\n"
        );
    }

    #[test]
    fn test_function_params_with_comments_go_multiline() {
        let source = "service S {\n  void f(\n    // the id\n    1: i32 id, 2: string name)\n}";
        assert_eq!(
            canonical(source),
            "service S {\n  void f(\n    // the id\n    1: i32 id,\n    2: string name\n  )\n}\n"
        );
    }
}
