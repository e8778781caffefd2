// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides temp-dir document builders and a standard processor setup

#![allow(dead_code)]

use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

use tomlj2::engine::Processor;
use tomlj2::template::TemplateContext;

/// Builds a document out of blank-line separated blocks.
pub struct TestDocumentBuilder {
    blocks: Vec<String>,
}

impl TestDocumentBuilder {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn with_block(mut self, block: &str) -> Self {
        self.blocks.push(block.trim_end().to_string());
        self
    }

    pub fn with_field(self, key: &str, value: &str) -> Self {
        self.with_block(&format!("{} = {}", key, value))
    }

    pub fn build(&self) -> String {
        let mut document = self.blocks.join("\n\n");
        document.push('\n');
        document
    }

    pub async fn write_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(path, self.build()).await?;
        Ok(())
    }
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn document_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.toml", name))
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}_output.json", name))
    }

    pub async fn create_document(&self, name: &str, builder: &TestDocumentBuilder) -> PathBuf {
        let document_file = self.document_file(name);
        builder
            .write_to_file(&document_file)
            .await
            .expect("Failed to write document file");
        document_file
    }

    pub async fn write_config(&self, contents: &str) -> PathBuf {
        let config_file = self.path().join("tomlj2.yaml");
        fs::write(&config_file, contents)
            .await
            .expect("Failed to write config file");
        config_file
    }
}

/// A user named Alice, aged 17.
pub fn alice_context() -> TemplateContext {
    TemplateContext::from_pairs([("username", json!("Alice")), ("user_age", json!(17))])
        .expect("context is scalar")
}

pub fn alice_processor() -> Processor {
    Processor::new(alice_context())
}

pub async fn read_json_output(
    file_path: &Path,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path).await?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let document = TestDocumentBuilder::new()
            .with_field("name", "\"{{ username }}\"")
            .with_block("[server]\nport = 80\n")
            .build();

        assert_eq!(document, "name = \"{{ username }}\"\n\n[server]\nport = 80\n");
    }

    #[test]
    fn test_environment_setup() {
        let env = TestEnvironment::new();
        assert!(env.path().exists());
        assert!(env.document_file("doc").ends_with("doc.toml"));
    }
}
