//! Fluent assertion API for Thrift documents

use crate::thrift::ast::{
    Comment, Document, DocumentMember, Enum, Field, FieldType, Function, NodeType,
    RequiredType, Service, Struct,
};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a document
pub fn assert_ast(doc: &Document) -> DocumentAssertion<'_> {
    DocumentAssertion { doc }
}

// ============================================================================
// Document Assertions
// ============================================================================

pub struct DocumentAssertion<'a> {
    doc: &'a Document,
}

impl<'a> DocumentAssertion<'a> {
    /// Assert the number of top-level definitions
    pub fn member_count(self, expected: usize) -> Self {
        let actual = self.doc.members.len();
        assert_eq!(
            actual,
            expected,
            "Expected {} members, found {} members: [{}]",
            expected,
            actual,
            summarize_members(&self.doc.members)
        );
        self
    }

    /// Assert on a specific definition by index
    pub fn member<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(MemberAssertion<'a>),
    {
        assert!(
            index < self.doc.members.len(),
            "Member index {} out of bounds (document has {} members)",
            index,
            self.doc.members.len()
        );
        assertion(MemberAssertion {
            member: &self.doc.members[index],
            context: format!("members[{}]", index),
        });
        self
    }

    pub fn trailing_comments(self, expected: &[&str]) -> Self {
        assert_comments(&self.doc.trailing_comments, expected, "trailingComments");
        self
    }
}

// ============================================================================
// Member Assertions
// ============================================================================

pub struct MemberAssertion<'a> {
    member: &'a DocumentMember,
    context: String,
}

impl<'a> MemberAssertion<'a> {
    pub fn kind(self, expected: NodeType) -> Self {
        assert_eq!(
            self.member.kind(),
            expected,
            "{}: Expected a {}, found a {}",
            self.context,
            expected,
            self.member.kind()
        );
        self
    }

    /// Assert the declared name; namespaces and includes have none
    pub fn name(self, expected: &str) -> Self {
        let actual = self.member.name().map(|name| name.value.as_str());
        assert_eq!(
            actual,
            Some(expected),
            "{}: Expected name '{}', found {:?}",
            self.context,
            expected,
            actual
        );
        self
    }

    /// Assert the raw text of the comments attached to this definition
    pub fn comments(self, expected: &[&str]) -> Self {
        assert_comments(self.member.comments(), expected, &self.context);
        self
    }

    pub fn annotation(self, name: &str, expected: &str) -> Self {
        let actual = self.member.annotations().and_then(|a| a.get(name));
        assert_eq!(
            actual,
            Some(expected),
            "{}: Expected annotation {} = '{}', found {:?}",
            self.context,
            name,
            expected,
            actual
        );
        self
    }

    /// Assert this is a struct, union or exception
    pub fn assert_struct(self) -> StructAssertion<'a> {
        match self.member {
            DocumentMember::Struct(node)
            | DocumentMember::Union(node)
            | DocumentMember::Exception(node) => StructAssertion {
                node,
                context: self.context,
            },
            other => panic!(
                "{}: Expected a struct-like definition, found {}",
                self.context,
                summarize_member(other)
            ),
        }
    }

    pub fn assert_enum(self) -> EnumAssertion<'a> {
        match self.member {
            DocumentMember::Enum(node) => EnumAssertion {
                node,
                context: self.context,
            },
            other => panic!(
                "{}: Expected an enum, found {}",
                self.context,
                summarize_member(other)
            ),
        }
    }

    pub fn assert_service(self) -> ServiceAssertion<'a> {
        match self.member {
            DocumentMember::Service(node) => ServiceAssertion {
                node,
                context: self.context,
            },
            other => panic!(
                "{}: Expected a service, found {}",
                self.context,
                summarize_member(other)
            ),
        }
    }
}

// ============================================================================
// Struct Assertions
// ============================================================================

pub struct StructAssertion<'a> {
    node: &'a Struct,
    context: String,
}

impl<'a> StructAssertion<'a> {
    pub fn field_count(self, expected: usize) -> Self {
        assert_field_count(&self.node.members, expected, &self.context);
        self
    }

    pub fn field<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(FieldAssertion<'a>),
    {
        let context = format!("{}.members", self.context);
        assertion(field_assertion(&self.node.members, index, context));
        self
    }
}

// ============================================================================
// Field Assertions
// ============================================================================

pub struct FieldAssertion<'a> {
    field: &'a Field,
    context: String,
}

impl<'a> FieldAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.field.name.value, expected,
            "{}: Expected field name '{}'",
            self.context, expected
        );
        self
    }

    /// Assert an explicit field ID
    pub fn id(self, expected: i64) -> Self {
        assert!(
            !self.field.is_implicit_id(),
            "{}: Expected field ID {}, but the ID is implicit",
            self.context,
            expected
        );
        assert_eq!(
            self.field.id(),
            Some(expected),
            "{}: Expected field ID {}",
            self.context,
            expected
        );
        self
    }

    pub fn implicit_id(self, expected: i64) -> Self {
        assert!(
            self.field.is_implicit_id(),
            "{}: Expected an implicit field ID, found `{}`",
            self.context,
            self.field.field_id.value
        );
        assert_eq!(self.field.id(), Some(expected), "{}: implicit ID", self.context);
        self
    }

    pub fn required(self, expected: RequiredType) -> Self {
        assert_eq!(
            self.field.required_type, expected,
            "{}: Expected requiredness '{}', found '{}'",
            self.context, expected, self.field.required_type
        );
        self
    }

    /// Assert the field type as it would be written, e.g. `map<string, i32>`
    pub fn type_text(self, expected: &str) -> Self {
        let actual = describe_type(&self.field.field_type);
        assert_eq!(
            actual, expected,
            "{}: Expected field type '{}', found '{}'",
            self.context, expected, actual
        );
        self
    }

    /// Assert the default value's source text
    pub fn default_value(self, expected: &str) -> Self {
        let actual = self
            .field
            .default_value
            .as_ref()
            .and_then(|value| value.as_common())
            .map(|common| common.value.as_str());
        assert_eq!(
            actual,
            Some(expected),
            "{}: Expected default value '{}', found {:?}",
            self.context,
            expected,
            actual
        );
        self
    }

    pub fn comments(self, expected: &[&str]) -> Self {
        assert_comments(&self.field.comments, expected, &self.context);
        self
    }
}

// ============================================================================
// Enum Assertions
// ============================================================================

pub struct EnumAssertion<'a> {
    node: &'a Enum,
    context: String,
}

impl<'a> EnumAssertion<'a> {
    pub fn member_count(self, expected: usize) -> Self {
        let actual = self.node.members.len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} enum members, found {}",
            self.context, expected, actual
        );
        self
    }

    /// Assert the resolved `(name, value)` pairs of every member
    pub fn values(self, expected: &[(&str, i64)]) -> Self {
        let actual = self.node.values();
        assert_eq!(
            actual.as_deref(),
            Some(expected),
            "{}: Enum values differ",
            self.context
        );
        self
    }
}

// ============================================================================
// Service Assertions
// ============================================================================

pub struct ServiceAssertion<'a> {
    node: &'a Service,
    context: String,
}

impl<'a> ServiceAssertion<'a> {
    pub fn extends(self, expected: Option<&str>) -> Self {
        let actual = self.node.extends.as_ref().map(|name| name.value.as_str());
        assert_eq!(
            actual, expected,
            "{}: Expected extends {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    pub fn function_count(self, expected: usize) -> Self {
        let actual = self.node.members.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} functions, found {}: [{}]",
            self.context,
            expected,
            actual,
            self.node
                .members
                .iter()
                .map(|function| function.name.value.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self
    }

    pub fn function<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(FunctionAssertion<'a>),
    {
        assert!(
            index < self.node.members.len(),
            "{}: Function index {} out of bounds (service has {} functions)",
            self.context,
            index,
            self.node.members.len()
        );
        assertion(FunctionAssertion {
            function: &self.node.members[index],
            context: format!("{}.members[{}]", self.context, index),
        });
        self
    }
}

// ============================================================================
// Function Assertions
// ============================================================================

pub struct FunctionAssertion<'a> {
    function: &'a Function,
    context: String,
}

impl<'a> FunctionAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.function.name.value, expected,
            "{}: Expected function name '{}'",
            self.context, expected
        );
        self
    }

    pub fn returns(self, expected: &str) -> Self {
        let actual = describe_type(&self.function.return_type);
        assert_eq!(
            actual, expected,
            "{}: Expected return type '{}', found '{}'",
            self.context, expected, actual
        );
        self
    }

    pub fn oneway(self, expected: bool) -> Self {
        assert_eq!(
            self.function.oneway, expected,
            "{}: Expected oneway = {}",
            self.context, expected
        );
        self
    }

    pub fn param_count(self, expected: usize) -> Self {
        assert_field_count(&self.function.params, expected, &self.context);
        self
    }

    pub fn param<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(FieldAssertion<'a>),
    {
        let context = format!("{}.params", self.context);
        assertion(field_assertion(&self.function.params, index, context));
        self
    }

    /// Assert the number of thrown exceptions; `None` for no `throws` clause
    pub fn throws_count(self, expected: Option<usize>) -> Self {
        let actual = self.function.throws.as_ref().map(Vec::len);
        assert_eq!(
            actual, expected,
            "{}: Expected {:?} thrown exceptions, found {:?}",
            self.context, expected, actual
        );
        self
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn field_assertion<'a>(fields: &'a [Field], index: usize, context: String) -> FieldAssertion<'a> {
    assert!(
        index < fields.len(),
        "{}: Field index {} out of bounds ({} fields)",
        context,
        index,
        fields.len()
    );
    FieldAssertion {
        field: &fields[index],
        context: format!("{}[{}]", context, index),
    }
}

fn assert_field_count(fields: &[Field], expected: usize, context: &str) {
    assert_eq!(
        fields.len(),
        expected,
        "{}: Expected {} fields, found {}: [{}]",
        context,
        expected,
        fields.len(),
        fields
            .iter()
            .map(|field| field.name.value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn assert_comments(comments: &[Comment], expected: &[&str], context: &str) {
    let actual: Vec<&str> = comments.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(actual, expected, "{}: Comments differ", context);
}

fn describe_type(field_type: &FieldType) -> String {
    let inner = |t: &Option<Box<FieldType>>| t.as_deref().map_or("?".to_string(), describe_type);
    match field_type {
        FieldType::Common(common) => common.value.clone(),
        FieldType::Collection(collection) => {
            let keyword = collection.kind.keyword().unwrap_or("list");
            format!("{}<{}>", keyword, inner(&collection.value_type))
        }
        FieldType::Map(map) => {
            format!("map<{}, {}>", inner(&map.key_type), inner(&map.value_type))
        }
    }
}

fn summarize_member(member: &DocumentMember) -> String {
    match member.name() {
        Some(name) => format!("{} '{}'", member.kind(), name.value),
        None => member.kind().to_string(),
    }
}

fn summarize_members(members: &[DocumentMember]) -> String {
    members
        .iter()
        .map(summarize_member)
        .collect::<Vec<_>>()
        .join(", ")
}
