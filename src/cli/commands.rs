// ABOUTME: Command implementations for the tomlj2 CLI
// ABOUTME: Handles the render, check, and extensions commands

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use super::config::Config;
use crate::engine::{Processor, RunOutcome};
use crate::output::{OutputConfig, OutputDestination, OutputHandler};
use crate::template::helpers::{builtin_names, resolve_builtins};
use crate::template::Role;

/// Build a processor from configuration plus any extra built-ins named on the command line.
pub fn build_processor(
    config: &Config,
    extra_filters: &[String],
    extra_globals: &[String],
) -> Result<Processor> {
    let context = config.template_context()?;

    let filter_names: Vec<String> = config
        .filters
        .iter()
        .chain(extra_filters)
        .cloned()
        .collect();
    let global_names: Vec<String> = config
        .globals
        .iter()
        .chain(extra_globals)
        .cloned()
        .collect();

    let filters = resolve_builtins(Role::Filter, &filter_names)?;
    let globals = resolve_builtins(Role::Global, &global_names)?;

    let mut processor = Processor::new(context).with_fuel(config.fuel);
    processor.tools(filters, globals)?;
    Ok(processor)
}

/// Process the document off the async runtime; reading and rendering are blocking work.
async fn process_document(processor: Processor, file: PathBuf) -> Result<RunOutcome> {
    let outcome = tokio::task::spawn_blocking(move || processor.run(&file)).await??;
    Ok(outcome)
}

fn failed(outcome: &RunOutcome) -> anyhow::Error {
    anyhow::anyhow!(
        "Document failed validation with {} error(s)",
        outcome.errors().len()
    )
}

/// Render a document and emit the outcome document
pub async fn render_document(
    file: PathBuf,
    filters: Vec<String>,
    globals: Vec<String>,
    format: Option<String>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    info!("Rendering document: {}", file.display());

    let processor = build_processor(config, &filters, &globals)?;
    let outcome = process_document(processor, file).await?;

    let mut output_config =
        OutputConfig::default().with_format(format.unwrap_or_else(|| config.output.format.clone()));
    if let Some(path) = output {
        output_config = output_config
            .with_destination(OutputDestination::new_file(path.to_string_lossy()));
    }

    OutputHandler::new()
        .output_outcome(&outcome, &output_config)
        .await?;

    // Non-zero exit status when the run ends in error
    if outcome.is_ok() {
        Ok(())
    } else {
        Err(failed(&outcome))
    }
}

/// Validate a document and print a one-line verdict plus diagnostics
pub async fn check_document(
    file: PathBuf,
    filters: Vec<String>,
    globals: Vec<String>,
    config: &Config,
) -> Result<()> {
    info!("Checking document: {}", file.display());

    let processor = build_processor(config, &filters, &globals)?;
    let outcome = process_document(processor, file.clone()).await?;

    let verdict = OutputHandler::new().format_outcome(&outcome, "text").await?;
    println!("{}: {}", file.display(), verdict);

    if outcome.is_ok() {
        Ok(())
    } else {
        Err(failed(&outcome))
    }
}

/// List the built-in extensions
pub async fn list_extensions() -> Result<()> {
    println!("Filters:");
    for name in builtin_names(Role::Filter) {
        println!("  {}", name);
    }
    println!("Globals:");
    for name in builtin_names(Role::Global) {
        println!("  {}", name);
    }
    Ok(())
}
