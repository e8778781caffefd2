// ABOUTME: Output formatters for run outcomes (JSON, YAML, text)
// ABOUTME: Encodes the status/data/errors document for the chosen presentation

use async_trait::async_trait;
use std::fmt::Write as _;

use super::error::{OutputError, Result};
use crate::engine::{RunOutcome, RunStatus};

#[async_trait]
pub trait OutputFormatter: Send + Sync {
    async fn format_outcome(&self, outcome: &RunOutcome) -> Result<String>;
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct YamlFormatter;

/// Human-oriented summary: a verdict line followed by records or diagnostics.
pub struct TextFormatter;

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }
}

#[async_trait]
impl OutputFormatter for JsonFormatter {
    async fn format_outcome(&self, outcome: &RunOutcome) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(outcome).map_err(OutputError::SerializationError)
        } else {
            serde_json::to_string(outcome).map_err(OutputError::SerializationError)
        }
    }
}

impl Default for YamlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlFormatter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputFormatter for YamlFormatter {
    async fn format_outcome(&self, outcome: &RunOutcome) -> Result<String> {
        serde_yaml::to_string(outcome).map_err(OutputError::YamlSerializationError)
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputFormatter for TextFormatter {
    async fn format_outcome(&self, outcome: &RunOutcome) -> Result<String> {
        let mut output = String::new();

        // Writing into a String cannot fail
        match outcome {
            RunOutcome::Ok { data } => {
                let _ = writeln!(output, "✓ {} ({} records)", RunStatus::Ok, data.len());
                for record in data {
                    let _ = writeln!(
                        output,
                        "  {}: {}",
                        record.record_type,
                        serde_json::to_string(&record.payload)?
                    );
                }
            }
            RunOutcome::Error { errors } => {
                let _ = writeln!(output, "✗ {} ({} errors)", RunStatus::Error, errors.len());
                for error in errors {
                    let _ = writeln!(output, "  - {}", error);
                }
            }
        }

        Ok(output.trim_end().to_string())
    }
}
