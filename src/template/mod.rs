// ABOUTME: Sandboxed expression rendering for tomlj2 documents
// ABOUTME: Provides the render context, extension registry, and value-tree resolution

pub mod context;
pub mod engine;
pub mod error;
pub mod extensions;
pub mod helpers;

pub use context::{infer_scalar, TemplateContext};
pub use engine::TemplateEngine;
pub use error::{Result, TemplateError};
pub use extensions::{Extension, ExtensionFn, ExtensionRegistry, NamedFunction, Role};
