// ABOUTME: Parser module for TOML documents with embedded expressions
// ABOUTME: Exports block splitting, syntax guarding, rewriting, and structural parsing

pub mod blocks;
pub mod document;
pub mod error;
pub mod patterns;
pub mod rewrite;
pub mod validation;

pub use blocks::{split_blocks, Block, BlockReader, Blocks};
pub use document::{parse_fields, Fields};
pub use error::{ParserError, ValidationError};
pub use rewrite::quote_expressions;
pub use validation::SyntaxGuard;
