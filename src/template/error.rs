// ABOUTME: Error types for template engine setup and extension registration
// ABOUTME: Render-time failures are reported as validation diagnostics instead

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Invalid extension name {name:?}: names must be non-empty identifiers")]
    InvalidExtensionName { name: String },

    #[error("Unknown {role} extension '{name}'. Available: {available:?}")]
    UnknownExtension {
        role: String,
        name: String,
        available: Vec<String>,
    },

    #[error("Context value for '{key}' must be a scalar")]
    NonScalarContext { key: String },
}

pub type Result<T> = std::result::Result<T, TemplateError>;
