// src/config/mod.rs

//! Graph declaration loaded from TOML.
//!
//! - [`model`] defines the raw (as-deserialised) and validated config types.
//! - [`loader`] reads and validates a config file from disk.
//! - [`validate`] converts raw config into a validated [`GraphConfig`],
//!   building the [`crate::graph::GraphDef`] in the process.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigSection, GraphConfig, NodeDecl, RawGraphConfig};
