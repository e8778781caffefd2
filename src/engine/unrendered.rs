// ABOUTME: Post-render check that no expression markers survive in a value tree
// ABOUTME: Pure inspection; the tree is never modified

use serde_json::Value as JsonValue;

use crate::parser::patterns::contains_expression;
use crate::parser::ValidationError;

/// Report every string scalar in `value` that still contains an expression.
pub fn find_unrendered(value: &JsonValue) -> Vec<ValidationError> {
    let mut found = Vec::new();
    collect(value, &mut found);
    found
}

fn collect(value: &JsonValue, found: &mut Vec<ValidationError>) {
    match value {
        JsonValue::String(s) if contains_expression(s) => {
            found.push(ValidationError::UnrenderedFound { value: s.clone() });
        }
        JsonValue::Array(items) => items.iter().for_each(|item| collect(item, found)),
        JsonValue::Object(map) => map.values().for_each(|item| collect(item, found)),
        _ => {}
    }
}
