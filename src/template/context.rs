// ABOUTME: Immutable render context of scalar variables
// ABOUTME: Built once before processing and shared read-only by every render

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use super::error::{Result, TemplateError};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateContext {
    variables: Map<String, JsonValue>,
}

impl TemplateContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from key/value pairs. Every value must be a string, number, or boolean.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<JsonValue>,
    {
        let mut variables = Map::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            if !is_scalar(&value) {
                return Err(TemplateError::NonScalarContext { key });
            }
            variables.insert(key, value);
        }
        Ok(Self { variables })
    }

    /// Consume the context and add one more variable
    pub fn with_variable(self, key: impl Into<String>, value: impl Into<JsonValue>) -> Result<Self> {
        let mut pairs: Vec<(String, JsonValue)> = self.variables.into_iter().collect();
        pairs.push((key.into(), value.into()));
        Self::from_pairs(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.variables.get(key)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

fn is_scalar(value: &JsonValue) -> bool {
    matches!(
        value,
        JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_)
    )
}

/// Interpret a command-line value: integer, float, or boolean when it parses
/// as one, otherwise the raw string.
pub fn infer_scalar(raw: &str) -> JsonValue {
    if let Ok(i) = raw.parse::<i64>() {
        return JsonValue::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return JsonValue::from(f);
        }
    }
    match raw {
        "true" => JsonValue::Bool(true),
        "false" => JsonValue::Bool(false),
        _ => JsonValue::String(raw.to_string()),
    }
}
