//! Whole-tree checks over the JSON form of a document

use crate::thrift::ast::{Document, Loc, SourceLocation};
use serde_json::Value;

/// The document as JSON with every `loc` removed
///
/// Two parses of differently formatted but equivalent sources have equal
/// structures.
pub fn structure_of(doc: &Document) -> Value {
    let mut value = serde_json::to_value(doc).expect("documents always encode");
    strip_locations(&mut value);
    value
}

fn strip_locations(value: &mut Value) {
    match value {
        Value::Object(object) => {
            object.remove("loc");
            object.values_mut().for_each(strip_locations);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_locations),
        _ => {}
    }
}

/// Assert that every node location lies within `source` and that each span's
/// line and column agree with its byte index
pub fn assert_locations_within(doc: &Document, source: &str) {
    let lines = SourceLocation::new(source);
    let value = serde_json::to_value(doc).expect("documents always encode");
    check_locations(&value, "$", source, &lines);
}

fn check_locations(value: &Value, path: &str, source: &str, lines: &SourceLocation) {
    match value {
        Value::Object(object) => {
            if let Some(loc) = object.get("loc") {
                let loc: Loc = serde_json::from_value(loc.clone())
                    .unwrap_or_else(|err| panic!("{}: unreadable loc: {}", path, err));
                check_loc(loc, path, source, lines);
            }
            for (key, child) in object {
                if key != "loc" {
                    check_locations(child, &format!("{}.{}", path, key), source, lines);
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                check_locations(item, &format!("{}[{}]", path, i), source, lines);
            }
        }
        _ => {}
    }
}

fn check_loc(loc: Loc, path: &str, source: &str, lines: &SourceLocation) {
    assert!(
        loc.start.index <= loc.end.index,
        "{}: loc ends before it starts: {:?}",
        path,
        loc
    );
    assert!(
        loc.end.index <= source.len(),
        "{}: loc end {} is past the end of the source ({} bytes)",
        path,
        loc.end.index,
        source.len()
    );
    for span in [loc.start, loc.end] {
        assert_eq!(
            lines.span_at(span.index),
            span,
            "{}: line/column disagree with byte index",
            path
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::parser::parse;

    #[test]
    fn test_structure_ignores_layout() {
        let compact = parse("struct A{1:i32 x}").unwrap();
        let spread = parse("struct A {\n    1: i32 x\n}\n").unwrap();
        assert_ne!(compact, spread);
        assert_eq!(structure_of(&compact), structure_of(&spread));
    }

    #[test]
    fn test_parsed_locations_are_within_source() {
        let source = "namespace py app\n\nstruct A {\n  1: list<i32> xs = [1, 2] (a = \"b\")\n}\n";
        assert_locations_within(&parse(source).unwrap(), source);
    }

    #[test]
    #[should_panic(expected = "past the end")]
    fn test_out_of_bounds_loc_panics() {
        let doc = parse("typedef i32 Id").unwrap();
        assert_locations_within(&doc, "typedef");
    }
}
