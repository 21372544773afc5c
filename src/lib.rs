// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod registry;

use std::sync::Arc;

use tracing::info;

use crate::cli::{CliArgs, Command};
use crate::config::{GraphConfig, default_config_path, load_and_validate};
use crate::engine::{ComputeContext, ContextInputs, EngineOptions, ExecutionEngine, RunResult};
use crate::errors::Result;
use crate::graph::{GraphDef, NodeId, resolve_order};
use crate::registry::HandlerRegistry;

/// Entry point for demand-triggered recomputation runs.
///
/// Owns the validated graph, the injected handler registry, and the engine
/// options. Performs no business logic of its own: it validates the source
/// node, builds the per-run context, delegates to the resolver and the
/// execution engine, and returns `{order, outputs}` verbatim.
#[derive(Debug)]
pub struct RecalcScheduler {
    graph: GraphDef,
    registry: HandlerRegistry,
    options: EngineOptions,
}

impl RecalcScheduler {
    pub fn new(graph: GraphDef) -> Self {
        Self::with_options(graph, EngineOptions::default())
    }

    pub fn with_options(graph: GraphDef, options: EngineOptions) -> Self {
        Self {
            graph,
            registry: HandlerRegistry::new(),
            options,
        }
    }

    /// Build a scheduler from a loaded [`GraphConfig`]; handlers still have
    /// to be wired into [`Self::registry`] at startup.
    pub fn from_config(cfg: &GraphConfig) -> Self {
        Self::with_options(cfg.graph().clone(), cfg.engine_options())
    }

    pub fn graph(&self) -> &GraphDef {
        &self.graph
    }

    /// Administrative surface: `register` / `register_fn` / `reset`.
    ///
    /// Registry mutation must happen during quiescent periods (startup,
    /// test setup), never while a run is in flight.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Declared node ids, in declaration order.
    pub fn list_nodes(&self) -> Vec<NodeId> {
        self.graph.nodes().cloned().collect()
    }

    /// Run a recomputation rooted at `source`.
    ///
    /// Fails only when `source` is not a declared node; every other failure
    /// is recorded per node inside the returned [`RunResult`].
    pub async fn run_recalculation(
        &self,
        source: &str,
        inputs: ContextInputs,
    ) -> Result<RunResult> {
        let order = resolve_order(&self.graph, source)?;
        info!(
            source = %source,
            subject = %inputs.subject,
            nodes = order.len(),
            "starting recomputation run"
        );

        let ctx = Arc::new(ComputeContext::from_inputs(inputs));
        let engine = ExecutionEngine::new(&self.graph, &self.registry, self.options);
        let outputs = engine.execute(&order, ctx).await;

        let failures = outputs.values().filter(|o| !o.is_ok()).count();
        info!(
            source = %source,
            nodes = order.len(),
            failures,
            "recomputation run finished"
        );

        Ok(RunResult { order, outputs })
    }
}

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the graph declaration, then prints the requested
/// inspection output. No handlers execute here; runs are triggered by the
/// surrounding system through [`RecalcScheduler::run_recalculation`].
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = args
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)?;

    match args.command {
        Command::List => {
            for node in cfg.graph().nodes() {
                println!("{node}");
            }
        }
        Command::Plan { source } => {
            let order = resolve_order(cfg.graph(), &source)?;
            for (i, node) in order.iter().enumerate() {
                println!("{:>3}. {node}", i + 1);
            }
        }
    }

    Ok(())
}
