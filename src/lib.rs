// ABOUTME: Main library module for tomlj2
// ABOUTME: Validates and renders TOML documents whose values embed Jinja expressions

pub mod cli;
pub mod engine;
pub mod output;
pub mod parser;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use engine::{Processor, ResultRecord, RunOutcome, RunStatus};
pub use output::{OutputHandler, OutputProcessor};
pub use parser::ValidationError;
pub use template::{Extension, NamedFunction, TemplateContext};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
