// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for tomlj2

use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::path::PathBuf;

use crate::template::infer_scalar;

#[derive(Parser)]
#[command(name = "tomlj2")]
#[command(about = "Validate and render TOML documents with embedded Jinja expressions")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a document and emit the outcome
    Render {
        #[arg(help = "Path to TOML document")]
        file: PathBuf,

        #[arg(
            short = 'V',
            long = "var",
            help = "Context variables (key=value)"
        )]
        vars: Vec<String>,

        #[arg(long = "filter", help = "Register a built-in filter by name")]
        filters: Vec<String>,

        #[arg(long = "global", help = "Register a built-in global by name")]
        globals: Vec<String>,

        #[arg(short, long, help = "Output format (json, pretty, yaml, text)")]
        format: Option<String>,

        #[arg(short, long, help = "Write the outcome to this file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Validate a document and print a verdict
    Check {
        #[arg(help = "Path to TOML document")]
        file: PathBuf,

        #[arg(short = 'V', long = "var", help = "Context variables (key=value)")]
        vars: Vec<String>,

        #[arg(long = "filter", help = "Register a built-in filter by name")]
        filters: Vec<String>,

        #[arg(long = "global", help = "Register a built-in global by name")]
        globals: Vec<String>,
    },

    /// List the built-in filters and globals
    Extensions,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from key=value format, typing each value
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<IndexMap<String, JsonValue>> {
        let mut variables = IndexMap::new();

        for var in vars {
            match var.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    variables.insert(key.trim().to_string(), infer_scalar(value));
                }
                _ => {
                    return Err(anyhow::anyhow!(
                        "Invalid variable format '{}'. Expected 'key=value'",
                        var
                    ));
                }
            }
        }

        Ok(variables)
    }
}
