// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::graph::NodeId;

#[derive(Error, Debug)]
pub enum CalcdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The requested source node is not part of the declared graph.
    ///
    /// This is the only run-fatal failure: without a valid source, no
    /// execution order can be computed. All other failures are recorded
    /// per node in the run result.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Cycle detected in graph: {0}")]
    GraphCycle(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CalcdagError>;
