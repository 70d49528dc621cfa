//! Canonical writer output

use std::fs;
use thrift_idl::thrift::ast::{Document, DocumentMember, FieldType, NodeType};
use thrift_idl::{from_json, initialize, parse, to_json, write, ErrorCode};

fn canonical(source: &str) -> String {
    write(&parse(source).unwrap()).unwrap()
}

#[test]
fn test_tutorial_canonical_form() {
    let source = fs::read_to_string("tests/fixtures/tutorial.thrift").unwrap();
    insta::assert_snapshot!(canonical(&source), @r###"
# Tutorial IDL exercising most of the grammar
include "shared.thrift"

namespace java tutorial
namespace py tutorial

typedef i32 MyInteger

const i32 INT32CONSTANT = 9853

const map<string, string> MAPCONSTANT = {"hello": "world", "goodnight": "moon"}

const list<double> RATIOS = [1.5, -2.5e-3, .5]

const i64 MASK = 0x7FFFFFFF

enum Operation {
  ADD = 1,
  SUBTRACT = 2,
  MULTIPLY,
  DIVIDE = 0x10 (deprecated = "true"),
}

struct Work {
  1: i32 num1 = 0
  2: i32 num2
  3: Operation op
  // optional commentary
  4: optional string comment
} (python.immutable = "")

union Value {
  1: string text
  2: binary blob
}

exception InvalidOperation {
  1: i32 whatOp
  2: required string why
}

/* The calculator */
service Calculator extends shared.SharedService {
  void ping()
  i32 add(1: i32 num1, 2: i32 num2)
  i32 calculate(1: i32 logid, 2: Work w) throws (1: InvalidOperation ouch)
  oneway void zip()
}

// end of tutorial
"###);
}

#[test]
fn test_messy_layout_is_normalised() {
    let source = "struct   Point{1:double x;2:double y;}typedef   list < Point >Path;";
    insta::assert_snapshot!(canonical(source), @r###"
struct Point {
  1: double x
  2: double y
}

typedef list<Point> Path
"###);
}

#[test]
fn test_strings_are_re_escaped() {
    let source = r#"const string GREETING = 'say "hi"\n\ttwice' (doc = "a\\b")"#;
    insta::assert_snapshot!(canonical(source), @r###"const string GREETING = "say \"hi\"\n\ttwice" (doc = "a\\b")"###);
}

#[test]
fn test_numbers_are_kept_verbatim() {
    assert_eq!(
        canonical("const list<double> XS = [+1, 1E3, 0XfF, 007]"),
        "const list<double> XS = [+1, 1E3, 0XfF, 007]\n"
    );
}

#[test]
fn test_output_is_a_fixpoint() {
    let source = fs::read_to_string("tests/fixtures/tutorial.thrift").unwrap();
    let once = canonical(&source);
    assert_eq!(canonical(&once), once);
}

#[test]
fn test_write_from_json_example() {
    let engine = initialize().unwrap();
    let json = engine.parse_to_json("namespace js example").unwrap();
    assert_eq!(engine.write(json.as_str()).unwrap().trim(), "namespace js example");
}

#[test]
fn test_map_without_value_type_is_a_serialization_error() {
    let mut doc: Document = parse("const map<string, i32> M = {}").unwrap();
    let DocumentMember::Const(constant) = &mut doc.members[0] else {
        panic!("expected a const");
    };
    let FieldType::Map(map) = &mut constant.field_type else {
        panic!("expected a map type");
    };
    map.value_type = None;

    let error = write(&doc).unwrap_err();
    assert_eq!(error.kind(), "SerializationError");
    assert_eq!(error.code(), ErrorCode::E200);
    assert_eq!(error.message(), "map type has no value type");

    // The same tree sent as JSON fails the same way
    let error = initialize()
        .unwrap()
        .write(to_json(&doc).unwrap().as_str())
        .unwrap_err();
    assert_eq!(error.code(), ErrorCode::E200);
}

#[test]
fn test_misplaced_kind_is_a_serialization_error() {
    let mut doc = parse("struct A { 1: i32 x }").unwrap();
    let DocumentMember::Struct(node) = &mut doc.members[0] else {
        panic!("expected a struct");
    };
    node.kind = NodeType::ServiceDefinition;

    let error = write(&doc).unwrap_err();
    assert_eq!(error.kind(), "SerializationError");
    assert_eq!(error.code(), ErrorCode::E201);
    assert!(error.message().contains("members[0]"));
    assert!(from_json(&to_json(&doc).unwrap()).is_err());
}

#[test]
fn test_text_that_would_not_reparse_is_a_serialization_error() {
    let mut doc = parse("// about A\nstruct A { 1: i32 x }").unwrap();
    let DocumentMember::Struct(node) = &mut doc.members[0] else {
        panic!("expected a struct");
    };
    node.members[0].name.value = "x y".to_string();

    let error = write(&doc).unwrap_err();
    assert_eq!(error.kind(), "SerializationError");
    assert_eq!(error.code(), ErrorCode::E201);
    assert!(error.message().contains("members[0].members[0].name"));

    let mut doc = parse("// about A\nstruct A { 1: i32 x }").unwrap();
    let DocumentMember::Struct(node) = &mut doc.members[0] else {
        panic!("expected a struct");
    };
    node.comments[0].value = "// about A\nstruct B {}".to_string();
    let error = write(&doc).unwrap_err();
    assert_eq!(error.code(), ErrorCode::E201);
    assert!(error.message().contains("members[0].comments[0]"));
}
