// src/engine/mod.rs

//! Execution engine for recomputation runs.
//!
//! - [`context`] holds the per-run input value object shared by all handlers.
//! - [`output`] defines per-node outputs, the failure taxonomy, and the
//!   run result returned to callers.
//! - [`executor`] walks a resolved order, invokes handlers, and applies the
//!   fail-the-branch-not-the-run policy.

pub mod context;
pub mod executor;
pub mod output;

pub use context::{ComputeContext, ContextInputs};
pub use executor::{EngineOptions, ExecutionEngine};
pub use output::{FailureReason, NodeFailure, NodeOutput, NodeStatus, RunResult};
