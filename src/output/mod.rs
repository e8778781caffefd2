// ABOUTME: Output handling for run outcomes
// ABOUTME: Looks up formatters and writers by name and emits the encoded outcome

pub mod config;
pub mod error;
pub mod formatter;
pub mod writer;

use async_trait::async_trait;
use std::collections::HashMap;

pub use self::config::{OutputConfig, OutputDestination};
pub use self::error::{OutputError, Result};
use self::formatter::{JsonFormatter, OutputFormatter, TextFormatter, YamlFormatter};
use self::writer::{FileWriter, OutputWriter, StdoutWriter};
use crate::engine::RunOutcome;

pub struct OutputHandler {
    formatters: HashMap<String, Box<dyn OutputFormatter>>,
    writers: HashMap<String, Box<dyn OutputWriter>>,
}

#[async_trait]
pub trait OutputProcessor: Send + Sync {
    async fn process_outcome(&self, outcome: &RunOutcome, config: &OutputConfig) -> Result<()>;
}

impl OutputHandler {
    pub fn new() -> Self {
        let mut handler = Self {
            formatters: HashMap::new(),
            writers: HashMap::new(),
        };

        handler.register_formatter("json", Box::new(JsonFormatter::new()));
        handler.register_formatter("pretty", Box::new(JsonFormatter::new_pretty()));
        handler.register_formatter("yaml", Box::new(YamlFormatter::new()));
        handler.register_formatter("text", Box::new(TextFormatter::new()));

        handler.register_writer("stdout", Box::new(StdoutWriter::new()));
        handler.register_writer("file", Box::new(FileWriter::new()));

        handler
    }

    pub fn register_formatter(&mut self, name: &str, formatter: Box<dyn OutputFormatter>) {
        self.formatters.insert(name.to_string(), formatter);
    }

    pub fn register_writer(&mut self, name: &str, writer: Box<dyn OutputWriter>) {
        self.writers.insert(name.to_string(), writer);
    }

    /// Encode `outcome` with the configured formatter.
    pub async fn format_outcome(&self, outcome: &RunOutcome, format: &str) -> Result<String> {
        let formatter = self
            .formatters
            .get(format)
            .ok_or_else(|| OutputError::FormatterNotFound {
                format: format.to_string(),
            })?;
        formatter.format_outcome(outcome).await
    }

    pub async fn output_outcome(&self, outcome: &RunOutcome, config: &OutputConfig) -> Result<()> {
        let formatted_output = self.format_outcome(outcome, &config.format).await?;

        for destination in &config.destinations {
            if let Some(writer) = self.writers.get(&destination.writer_type) {
                writer.write(&formatted_output, destination).await?;
            } else {
                return Err(OutputError::WriterNotFound {
                    writer_type: destination.writer_type.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn list_formatters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn list_writers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.writers.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl OutputProcessor for OutputHandler {
    async fn process_outcome(&self, outcome: &RunOutcome, config: &OutputConfig) -> Result<()> {
        self.output_outcome(outcome, config).await
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
