// ABOUTME: Error types for document scanning, parsing, and validation
// ABOUTME: Defines the diagnostic taxonomy reported in a run's error list

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to read document: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// One entry of a run's error list.
///
/// The `Display` output is the exact message emitted in the outcome document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Only expression syntax allowed, got: {region}")]
    NonExpressionRegion { region: String },

    #[error("Expression must appear only after '=': {region}")]
    MisplacedExpression { region: String },

    #[error("parse error: {message}")]
    Parse { message: String },

    #[error("Template error in {template:?}: {message}")]
    Template { template: String, message: String },

    #[error("Rendered value is empty for {template:?}")]
    EmptyRender { template: String },

    #[error("Unrendered expression remains in {template:?}")]
    UnrenderedRemains { template: String },

    #[error("Unrendered expression found: {value}")]
    UnrenderedFound { value: String },
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;
