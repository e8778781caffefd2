// ABOUTME: Document processor tying the block pipeline together
// ABOUTME: Registration of extensions plus the per-run fold over blocks with error accumulation

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::{EngineError, Result};
use super::result::{ResultRecord, RunOutcome};
use super::unrendered::find_unrendered;
use crate::parser::document::describe;
use crate::parser::{
    parse_fields, quote_expressions, split_blocks, Block, BlockReader, SyntaxGuard,
    ValidationError,
};
use crate::template::{Extension, ExtensionRegistry, Role, TemplateContext, TemplateEngine};

/// Validates and renders documents against a fixed context and extension registry.
///
/// The context and registry live as long as the processor and are only read
/// during a run, so one processor can serve concurrent runs over different
/// documents. Each run owns its own error list and results.
#[derive(Clone, Default)]
pub struct Processor {
    engine: TemplateEngine,
    guard: SyntaxGuard,
}

/// Accumulators owned by a single run.
#[derive(Debug, Default)]
struct RunState {
    errors: Vec<ValidationError>,
    results: Vec<ResultRecord>,
    blocks: usize,
}

impl Processor {
    pub fn new(context: TemplateContext) -> Self {
        Self {
            engine: TemplateEngine::new(context),
            guard: SyntaxGuard::new(),
        }
    }

    /// Bound the evaluation work of each individual render.
    pub fn with_fuel(mut self, fuel: Option<u64>) -> Self {
        self.engine.set_fuel(fuel);
        self
    }

    pub fn context(&self) -> &TemplateContext {
        self.engine.context()
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        self.engine.registry()
    }

    /// Register filters and globals under their declared names.
    ///
    /// Every name is checked before anything is registered, so a rejected call
    /// leaves the processor unchanged. Later bindings overwrite earlier ones with
    /// the same name.
    pub fn tools<F, G>(&mut self, filters: F, globals: G) -> Result<&mut Self>
    where
        F: IntoIterator<Item = Arc<dyn Extension>>,
        G: IntoIterator<Item = Arc<dyn Extension>>,
    {
        let pending: Vec<(Role, Arc<dyn Extension>)> = filters
            .into_iter()
            .map(|f| (Role::Filter, f))
            .chain(globals.into_iter().map(|g| (Role::Global, g)))
            .collect();

        for (_, extension) in &pending {
            ExtensionRegistry::validate_name(extension.as_ref())?;
        }

        for (role, extension) in pending {
            debug!("Registering {} '{}'", role, extension.name());
            self.engine.register(role, extension)?;
        }

        Ok(self)
    }

    /// Process the document at `path`.
    ///
    /// I/O failures abort with `Err`; everything wrong with the document itself
    /// is reported through the returned outcome.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<RunOutcome> {
        let path = path.as_ref();
        info!("Processing document: {}", path.display());

        let file = File::open(path).map_err(|source| EngineError::DocumentOpen {
            path: path.to_path_buf(),
            source,
        })?;
        self.run_reader(BufReader::new(file))
    }

    /// Process a document streamed from `reader`, one block at a time.
    pub fn run_reader<R: BufRead>(&self, reader: R) -> Result<RunOutcome> {
        let mut run = RunState::default();
        for block in BlockReader::new(reader) {
            self.process_block(&block?, &mut run);
        }
        Ok(self.finish(run))
    }

    /// Process an in-memory document.
    pub fn run_str(&self, text: &str) -> RunOutcome {
        let mut run = RunState::default();
        for block in split_blocks(text) {
            self.process_block(&block, &mut run);
        }
        self.finish(run)
    }

    fn process_block(&self, block: &Block, run: &mut RunState) {
        run.blocks += 1;
        debug!("Block {}: {} line(s)", run.blocks, block.line_count());

        // Violations are recorded but the block is still parsed and rendered
        run.errors.extend(self.guard.check(block.raw()));

        let rewritten = quote_expressions(block.raw());
        let fields = match parse_fields(&rewritten) {
            Ok(fields) => fields,
            Err(e) => {
                let message = describe(&e);
                debug!("Block {}: parse failed: {}", run.blocks, message);
                run.errors.push(ValidationError::Parse { message });
                return;
            }
        };

        for (key, value) in fields {
            let Some(rendered) = self.engine.resolve_value(&value, &mut run.errors) else {
                debug!("Block {}: field '{}' dropped", run.blocks, key);
                continue;
            };
            run.errors.extend(find_unrendered(&rendered));
            run.results.push(ResultRecord::new(key, rendered));
        }
    }

    fn finish(&self, run: RunState) -> RunOutcome {
        let outcome = RunOutcome::from_parts(run.results, run.errors);
        match &outcome {
            RunOutcome::Ok { data } => info!(
                "Processed {} block(s) into {} record(s)",
                run.blocks,
                data.len()
            ),
            RunOutcome::Error { errors } => warn!(
                "Processed {} block(s) with {} error(s)",
                run.blocks,
                errors.len()
            ),
        }
        outcome
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("context", self.context())
            .field("registry", self.registry())
            .finish()
    }
}
