// ABOUTME: Output writers for formatted outcomes (stdout, files)
// ABOUTME: Writes the encoded outcome document to its configured destination

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::config::{FileWriterConfig, OutputDestination, StdoutWriterConfig};
use super::error::{OutputError, Result};

#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn write(&self, content: &str, destination: &OutputDestination) -> Result<()>;
}

pub struct StdoutWriter;

pub struct FileWriter;

impl Default for StdoutWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputWriter for StdoutWriter {
    async fn write(&self, content: &str, destination: &OutputDestination) -> Result<()> {
        let config: StdoutWriterConfig = destination.get_config().unwrap_or_default();

        if !config.quiet {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(content.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        debug!("Output written to stdout ({} chars)", content.len());
        Ok(())
    }
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputWriter for FileWriter {
    async fn write(&self, content: &str, destination: &OutputDestination) -> Result<()> {
        let config: FileWriterConfig =
            destination
                .get_config()
                .map_err(|e| OutputError::ConfigError {
                    message: format!("Invalid file writer config: {}", e),
                })?;

        let output_path = Path::new(&config.path);

        if config.create_dirs {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| OutputError::WriteError {
                        message: format!("Failed to create directory {}: {}", parent.display(), e),
                    })?;
            }
        }

        fs::write(&config.path, format!("{content}\n"))
            .await
            .map_err(|e| OutputError::WriteError {
                message: format!("Failed to write file {}: {}", config.path, e),
            })?;

        info!(
            "Output written to file: {} ({} bytes)",
            config.path,
            content.len()
        );
        Ok(())
    }
}
