// ABOUTME: Configuration types for emitting run outcomes
// ABOUTME: Selects the formatter by name and lists the destinations to write to

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::OutputError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_destinations")]
    pub destinations: Vec<OutputDestination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDestination {
    pub writer_type: String,
    #[serde(default)]
    pub config: HashMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileWriterConfig {
    pub path: String,
    #[serde(default = "default_true")]
    pub create_dirs: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StdoutWriterConfig {
    #[serde(default)]
    pub quiet: bool,
}

fn default_format() -> String {
    "pretty".to_string()
}

fn default_destinations() -> Vec<OutputDestination> {
    vec![OutputDestination::new_stdout()]
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            destinations: default_destinations(),
        }
    }
}

impl OutputConfig {
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Replace the destinations with a single one.
    pub fn with_destination(mut self, destination: OutputDestination) -> Self {
        self.destinations = vec![destination];
        self
    }
}

impl OutputDestination {
    pub fn new_stdout() -> Self {
        Self {
            writer_type: "stdout".to_string(),
            config: HashMap::new(),
        }
    }

    pub fn new_file<S: Into<String>>(path: S) -> Self {
        let mut config = HashMap::new();
        config.insert("path".to_string(), serde_yaml::Value::String(path.into()));

        Self {
            writer_type: "file".to_string(),
            config,
        }
    }

    pub fn get_config<T>(&self) -> Result<T, OutputError>
    where
        T: serde::de::DeserializeOwned,
    {
        let config_value = serde_yaml::Value::Mapping(
            self.config
                .iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
                .collect(),
        );

        serde_yaml::from_value(config_value).map_err(|e| OutputError::ConfigError {
            message: format!("Failed to parse destination config: {}", e),
        })
    }
}
