//! Helpers shared by the integration tests

use epl_core::ast::Statement;
use serde_json::Value;

/// The statement as JSON with every `span` field removed, so trees parsed
/// from differently formatted text compare equal.
pub fn shape(stmt: &Statement) -> Value {
    strip_spans(serde_json::to_value(stmt).expect("AST serializes"))
}

fn strip_spans(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key != "span")
                .map(|(key, value)| (key, strip_spans(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_spans).collect()),
        other => other,
    }
}

/// Parses `source`, prints it, parses the printed text and checks both trees
/// agree. Returns the printed text.
pub fn assert_round_trip(source: &str) -> String {
    let first = epl_parser::parse_statement(source)
        .unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"));
    let printed = first.to_string();
    let second = epl_parser::parse_statement(&printed)
        .unwrap_or_else(|e| panic!("failed to reparse {printed:?} (from {source:?}): {e}"));
    assert_eq!(
        shape(&first),
        shape(&second),
        "round trip changed the tree\n  source:  {source}\n  printed: {printed}"
    );
    assert_eq!(printed, second.to_string(), "printing is not stable for {source}");
    printed
}
