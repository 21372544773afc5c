// src/graph/mod.rs

//! Graph definition and order resolution.
//!
//! - [`def`] holds the validated directed acyclic graph of calculation nodes.
//! - [`resolve`] computes the downstream closure of a source node and a
//!   deterministic topological order over it.

pub mod def;
pub mod resolve;

pub use def::{Edge, GraphDef, NodeId};
pub use resolve::resolve_order;
