// ABOUTME: Error types for processor setup and document access
// ABOUTME: Block-level diagnostics never surface here; they belong to the run outcome

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to open document {path}: {source}")]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read document: {0}")]
    DocumentRead(#[from] std::io::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] crate::template::TemplateError),

    #[error("Parser error: {0}")]
    ParserError(#[from] crate::parser::ParserError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
