// ABOUTME: Structural parsing of a rewritten block into an ordered value tree
// ABOUTME: Wraps the toml crate and converts its values into serde_json values

use serde_json::{Map, Number, Value as JsonValue};
use toml::Value as TomlValue;

use super::error::{ParserError, Result};

/// Top-level fields of one block, in document order.
pub type Fields = Map<String, JsonValue>;

/// Parse block text into its top-level fields.
pub fn parse_fields(text: &str) -> Result<Fields> {
    let table: toml::Table = toml::from_str(text).map_err(ParserError::TomlError)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, to_json(value)))
        .collect())
}

/// Convert a TOML value. Datetimes become their RFC 3339 text.
pub fn to_json(value: TomlValue) -> JsonValue {
    match value {
        TomlValue::String(s) => JsonValue::String(s),
        TomlValue::Integer(i) => JsonValue::Number(i.into()),
        // TOML permits nan/inf, which JSON numbers cannot carry
        TomlValue::Float(f) => Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(f.to_string())),
        TomlValue::Boolean(b) => JsonValue::Bool(b),
        TomlValue::Datetime(dt) => JsonValue::String(dt.to_string()),
        TomlValue::Array(items) => JsonValue::Array(items.into_iter().map(to_json).collect()),
        TomlValue::Table(table) => JsonValue::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, to_json(value)))
                .collect(),
        ),
    }
}

/// Short single-line description of a TOML parse failure.
pub fn describe(error: &ParserError) -> String {
    match error {
        ParserError::TomlError(e) => e.message().to_string(),
        other => other.to_string(),
    }
}
