// ABOUTME: Processing engine for tomlj2 documents
// ABOUTME: Runs the block pipeline, validates rendered values, and aggregates the outcome

pub mod error;
pub mod processor;
pub mod result;
pub mod unrendered;

pub use error::{EngineError, Result};
pub use processor::Processor;
pub use result::{ResultRecord, RunOutcome, RunStatus};
pub use unrendered::find_unrendered;
