// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::engine::EngineOptions;
use crate::graph::GraphDef;

fn default_node_timeout_secs() -> u64 {
    30
}

/// `[config]` section: engine-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Per-node handler timeout, in seconds.
    #[serde(default = "default_node_timeout_secs")]
    pub node_timeout_secs: u64,
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            node_timeout_secs: default_node_timeout_secs(),
        }
    }
}

/// One `[[node]]` entry.
///
/// Nodes are declared as an *array* of tables rather than a keyed table so
/// that declaration order survives deserialisation; the resolver uses it as
/// its deterministic tie-break key.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDecl {
    pub name: String,
    /// Upstream nodes this one must be recomputed after.
    #[serde(default)]
    pub after: Vec<String>,
}

/// Config file exactly as deserialised, before semantic validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGraphConfig {
    #[serde(default)]
    pub config: ConfigSection,
    #[serde(default)]
    pub node: Vec<NodeDecl>,
}

/// Validated configuration: engine settings plus the constructed graph.
///
/// Obtained via `GraphConfig::try_from(raw)`; see [`super::validate`].
#[derive(Debug, Clone)]
pub struct GraphConfig {
    config: ConfigSection,
    nodes: Vec<NodeDecl>,
    graph: GraphDef,
}

impl GraphConfig {
    pub(crate) fn new_unchecked(config: ConfigSection, nodes: Vec<NodeDecl>, graph: GraphDef) -> Self {
        Self {
            config,
            nodes,
            graph,
        }
    }

    pub fn graph(&self) -> &GraphDef {
        &self.graph
    }

    /// Node declarations in file order.
    pub fn node_decls(&self) -> &[NodeDecl] {
        &self.nodes
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            node_timeout: Duration::from_secs(self.config.node_timeout_secs),
        }
    }
}
