// src/engine/output.rs

//! Per-node outputs, the failure taxonomy, and the run result.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::graph::NodeId;

/// Status of one handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Ok,
    Error,
}

/// Why a handler invocation counted as a `HandlerExecutionError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureReason {
    /// The handler returned an error.
    Failed,
    /// The handler exceeded the per-node timeout.
    Timeout,
    /// The handler panicked.
    Panic,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureReason::Failed => "failed",
            FailureReason::Timeout => "timeout",
            FailureReason::Panic => "panic",
        };
        f.write_str(s)
    }
}

/// Node-local failure recorded in a run result.
///
/// None of these abort the run; each is recorded as the node's output and
/// blocks that node's dependents within the same run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeFailure {
    /// The node has no registered compute handler.
    #[error("no compute handler registered for this node")]
    UnregisteredHandler,

    /// A registered handler returned an error, timed out, or panicked.
    #[error("handler execution failed ({reason}): {message}")]
    HandlerExecution {
        reason: FailureReason,
        message: String,
    },

    /// The node was skipped because an upstream node failed in this run.
    #[error("blocked: upstream node '{upstream}' failed in this run")]
    Blocked { upstream: NodeId },
}

impl NodeFailure {
    /// Stable error kind identifier, as exposed on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeFailure::UnregisteredHandler => "UnregisteredHandlerError",
            NodeFailure::HandlerExecution { .. } => "HandlerExecutionError",
            NodeFailure::Blocked { .. } => "BlockedError",
        }
    }
}

// Wire form: `{ kind, message }` plus `reason` for execution failures and
// `upstream` for blocked nodes.
impl Serialize for NodeFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("kind", self.kind())?;
        map.serialize_entry("message", &self.to_string())?;
        match self {
            NodeFailure::UnregisteredHandler => {}
            NodeFailure::HandlerExecution { reason, .. } => {
                map.serialize_entry("reason", reason)?;
            }
            NodeFailure::Blocked { upstream } => {
                map.serialize_entry("upstream", upstream)?;
            }
        }
        map.end()
    }
}

/// Result of one handler invocation (or the reason it did not run).
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    /// When this output was recorded (ISO-8601 on the wire).
    pub at: DateTime<Utc>,
    pub status: NodeStatus,
    /// Opaque domain payload returned by the handler; absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<NodeFailure>,
}

impl NodeOutput {
    pub fn ok(details: Value) -> Self {
        Self {
            at: Utc::now(),
            status: NodeStatus::Ok,
            details: Some(details),
            error: None,
        }
    }

    pub fn failed(failure: NodeFailure) -> Self {
        Self {
            at: Utc::now(),
            status: NodeStatus::Error,
            details: None,
            error: Some(failure),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == NodeStatus::Ok
    }

    pub fn failure(&self) -> Option<&NodeFailure> {
        self.error.as_ref()
    }
}

/// Everything one recomputation run produced.
///
/// `outputs` has an entry for every node in `order`, success or failure;
/// callers must inspect per-node status rather than a single overall flag.
/// Not persisted anywhere; returned directly to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub order: Vec<NodeId>,
    pub outputs: BTreeMap<NodeId, NodeOutput>,
}

impl RunResult {
    pub fn output(&self, node: &str) -> Option<&NodeOutput> {
        self.outputs.get(node)
    }
}
