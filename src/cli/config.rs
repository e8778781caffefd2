// ABOUTME: Configuration management for the tomlj2 application
// ABOUTME: Loads the YAML config file, applies environment overrides, and builds the render context

use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::PathBuf;

use crate::template::TemplateContext;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Variables visible to every expression. Values must be scalars.
    #[serde(default)]
    pub context: IndexMap<String, JsonValue>,

    /// Built-in filters to register, by name.
    #[serde(default)]
    pub filters: Vec<String>,

    /// Built-in globals to register, by name.
    #[serde(default)]
    pub globals: Vec<String>,

    /// Evaluation budget per render; unlimited when absent.
    #[serde(default)]
    pub fuel: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_format")]
    pub format: String,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_output_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_log_format(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            _ => Config::default(),
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".tomlj2").join("config.yaml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        [
            PathBuf::from("tomlj2.yaml"),
            PathBuf::from("tomlj2.yml"),
            PathBuf::from(".tomlj2.yaml"),
            PathBuf::from(".tomlj2.yml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("TOMLJ2_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TOMLJ2_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(format) = std::env::var("TOMLJ2_OUTPUT_FORMAT") {
            self.output.format = format;
        }
        if let Ok(fuel) = std::env::var("TOMLJ2_FUEL") {
            self.fuel = Some(fuel.parse().context("TOMLJ2_FUEL must be an integer")?);
        }

        Ok(())
    }

    /// Merge command-line variables over the configured context
    pub fn merge_variables(&mut self, vars: IndexMap<String, JsonValue>) {
        self.context.extend(vars);
    }

    /// Build the immutable render context
    pub fn template_context(&self) -> Result<TemplateContext> {
        TemplateContext::from_pairs(self.context.clone()).context("Invalid context in configuration")
    }
}
