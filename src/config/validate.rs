// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{GraphConfig, RawGraphConfig};
use crate::errors::{CalcdagError, Result};
use crate::graph::{Edge, GraphDef, NodeId};

impl TryFrom<RawGraphConfig> for GraphConfig {
    type Error = CalcdagError;

    fn try_from(raw: RawGraphConfig) -> Result<Self> {
        validate_raw_config(&raw)?;
        let graph = build_graph(&raw)?;
        Ok(GraphConfig::new_unchecked(raw.config, raw.node, graph))
    }
}

/// Config-shape checks with config-level error messages. Graph-structural
/// validation (undeclared endpoints, self-edges, cycles) happens when the
/// [`GraphDef`] is constructed.
fn validate_raw_config(raw: &RawGraphConfig) -> Result<()> {
    if raw.node.is_empty() {
        return Err(CalcdagError::ConfigError(
            "config must declare at least one [[node]]".to_string(),
        ));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for decl in &raw.node {
        if decl.name.trim().is_empty() {
            return Err(CalcdagError::ConfigError(
                "[[node]] entries must have a non-empty name".to_string(),
            ));
        }
        if !seen.insert(decl.name.as_str()) {
            return Err(CalcdagError::ConfigError(format!(
                "node '{}' is declared more than once",
                decl.name
            )));
        }
    }

    Ok(())
}

/// Build the graph from declarations.
///
/// For `[[node]] name = "B", after = ["A"]` we add the edge A -> B:
/// B is downstream of A.
fn build_graph(raw: &RawGraphConfig) -> Result<GraphDef> {
    let nodes: Vec<NodeId> = raw.node.iter().map(|d| NodeId::from(d.name.as_str())).collect();

    let edges: Vec<Edge> = raw
        .node
        .iter()
        .flat_map(|decl| {
            decl.after
                .iter()
                .map(move |dep| Edge::new(dep.as_str(), decl.name.as_str()))
        })
        .collect();

    GraphDef::new(nodes, edges)
}
