//! JSON interchange form of the AST
//!
//! The JSON shape is the serde shape of the [`ast`](crate::thrift::ast) types:
//! every node is an object with a `kind` discriminator and a `loc`, and every
//! field of the tree is present, so `from_json(to_json(doc))` gives back `doc`.

use crate::thrift::ast::shape::check_document;
use crate::thrift::ast::Document;
use crate::thrift::error::{ErrorCode, ErrorLocation, IdlError, Result};
use log::debug;

/// Encode a document as compact JSON
pub fn to_json(document: &Document) -> Result<String> {
    serde_json::to_string(document).map_err(encode_error)
}

/// Encode a document as indented JSON
pub fn to_json_pretty(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(encode_error)
}

/// Encode a document as YAML, for reading rather than interchange
pub fn to_yaml(document: &Document) -> Result<String> {
    serde_yaml::to_string(document).map_err(|err| {
        IdlError::serialization(ErrorCode::E202, format!("failed to encode YAML: {err}"))
    })
}

/// Decode a document from its JSON form
///
/// Fails with a `DeserializationError` on malformed JSON, unknown kinds,
/// missing or mistyped fields (E300) and on kinds placed where the tree does
/// not admit them (E301).
pub fn from_json(text: &str) -> Result<Document> {
    let document: Document = serde_json::from_str(text).map_err(|err| decode_error(err, text))?;
    check_document(&document).map_err(|err| {
        IdlError::deserialization(ErrorCode::E301, err.to_string())
            .with_help("each node must fit its position and read back as written")
    })?;
    debug!(members = document.members.len(); "Decoded Thrift document from JSON");
    Ok(document)
}

fn encode_error(err: serde_json::Error) -> IdlError {
    IdlError::serialization(ErrorCode::E202, format!("failed to encode JSON: {err}"))
}

fn decode_error(err: serde_json::Error, text: &str) -> IdlError {
    let help = if err.is_data() {
        "the JSON is well formed but does not describe a ThriftDocument"
    } else {
        "the input is not valid JSON"
    };
    let error = IdlError::deserialization(ErrorCode::E300, err.to_string()).with_help(help);
    if err.line() == 0 {
        return error;
    }
    error.with_location(ErrorLocation::from_line_column(text, err.line(), err.column()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::ast::{DocumentMember, NodeType};
    use crate::thrift::parser::{parse, MAX_NESTING};
    use crate::thrift::writer::write;

    fn nested_const_map(depth: usize) -> String {
        let mut value = String::from("\"v\"");
        for _ in 0..depth {
            value = format!("{{\"k\": {value}}}");
        }
        value
    }

    fn service_with_nesting(depth: usize) -> String {
        let list_type = format!("{}i32{}", "list<".repeat(depth), ">".repeat(depth));
        format!(
            "service S {{\n  void f(1: {list_type} xs, 2: map<string, string> m = {}) throws (1: E e = {})\n}}",
            nested_const_map(depth),
            nested_const_map(depth),
        )
    }

    #[test]
    fn test_deepest_parsable_document_decodes() {
        let document = parse(&service_with_nesting(MAX_NESTING)).unwrap();
        assert_eq!(from_json(&to_json(&document).unwrap()).unwrap(), document);
        assert_eq!(from_json(&to_json_pretty(&document).unwrap()).unwrap(), document);

        let error = parse(&service_with_nesting(MAX_NESTING + 1)).unwrap_err();
        assert_eq!(error.code(), ErrorCode::E105);
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let source = "// lead\nnamespace js example\nstruct A { 1: optional map<string, i32> m = {\"a\": 1} (x = \"y\") }\n# tail\n";
        let document = parse(source).unwrap();
        assert_eq!(from_json(&to_json(&document).unwrap()).unwrap(), document);
        assert_eq!(from_json(&to_json_pretty(&document).unwrap()).unwrap(), document);
    }

    #[test]
    fn test_wire_names() {
        let document = parse("struct A { 1: required list<i32> xs }").unwrap();
        let value: serde_json::Value = serde_json::from_str(&to_json(&document).unwrap()).unwrap();
        let field = &value["members"][0]["members"][0];
        assert_eq!(value["kind"], "ThriftDocument");
        assert_eq!(field["kind"], "FieldDefinition");
        assert_eq!(field["fieldID"]["value"], "1");
        assert_eq!(field["requiredType"], "required");
        assert_eq!(field["fieldType"]["kind"], "ListType");
        assert_eq!(field["fieldType"]["valueType"]["kind"], "I32Keyword");
        assert_eq!(field["loc"]["start"]["line"], 1);
    }

    #[test]
    fn test_unknown_kind() {
        let error = from_json(r#"{"kind":"Bogus"}"#).unwrap_err();
        assert_eq!(error.kind(), "DeserializationError");
        assert_eq!(error.code(), ErrorCode::E300);
    }

    #[test]
    fn test_malformed_json_has_location() {
        let error = from_json("{\n  \"kind\": ").unwrap_err();
        assert_eq!(error.code(), ErrorCode::E300);
        assert_eq!(error.location().map(|location| location.line), Some(2));
    }

    #[test]
    fn test_misplaced_kind() {
        let document = parse("typedef i32 Id").unwrap();
        let json = to_json(&document)
            .unwrap()
            .replace("\"TypedefDefinition\"", "\"ServiceDefinition\"");
        // A typedef body tagged as a service does not decode as either
        assert!(from_json(&json).is_err());

        let json = to_json(&document)
            .unwrap()
            .replace("\"I32Keyword\"", "\"VoidKeyword\"");
        let error = from_json(&json).unwrap_err();
        assert_eq!(error.code(), ErrorCode::E301);
        assert!(error.message().contains("members[0].definitionType"));
    }

    #[test]
    fn test_text_and_locations_are_checked() {
        let document = parse("struct A { 1: i32 x }").unwrap();
        let value: serde_json::Value = serde_json::from_str(&to_json(&document).unwrap()).unwrap();

        let mut inverted = value.clone();
        inverted["members"][0]["loc"]["start"]["index"] = serde_json::json!(100);
        let error = from_json(&inverted.to_string()).unwrap_err();
        assert_eq!(error.code(), ErrorCode::E301);
        assert!(error.message().contains("`members[0].loc` ends before it starts"));

        let mut spaced = value.clone();
        spaced["members"][0]["members"][0]["name"]["value"] = serde_json::json!("x\ny");
        let error = from_json(&spaced.to_string()).unwrap_err();
        assert_eq!(error.kind(), "DeserializationError");
        assert_eq!(error.code(), ErrorCode::E301);
        assert!(error.message().contains("members[0].members[0].name"));
    }

    #[test]
    fn test_missing_map_value_type_fails_at_write() {
        let document = parse("typedef map<string, i32> M").unwrap();
        let mut value: serde_json::Value =
            serde_json::from_str(&to_json(&document).unwrap()).unwrap();
        value["members"][0]["definitionType"]
            .as_object_mut()
            .unwrap()
            .remove("valueType");

        let decoded = from_json(&value.to_string()).unwrap();
        let DocumentMember::Typedef(typedef) = &decoded.members[0] else {
            panic!("expected a typedef");
        };
        assert_eq!(typedef.definition_type.kind(), NodeType::MapType);

        let error = write(&decoded).unwrap_err();
        assert_eq!(error.kind(), "SerializationError");
        assert_eq!(error.code(), ErrorCode::E200);
    }

    #[test]
    fn test_yaml() {
        let document = parse("const i32 X = 1").unwrap();
        let yaml = to_yaml(&document).unwrap();
        assert!(yaml.contains("kind: ConstDefinition"));
    }
}
