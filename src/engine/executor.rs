// src/engine/executor.rs

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::context::ComputeContext;
use crate::engine::output::{FailureReason, NodeFailure, NodeOutput};
use crate::graph::{GraphDef, NodeId};
use crate::registry::{ComputeHandler, HandlerRegistry};

/// Execution knobs for one scheduler instance.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Per-node handler timeout. A timeout counts as a
    /// `HandlerExecutionError` and blocks dependents like any other failure.
    pub node_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            node_timeout: Duration::from_secs(30),
        }
    }
}

/// Walks a resolved order and invokes the registered handler for each node.
///
/// Responsibilities:
/// - look up each node's handler in the registry
/// - skip nodes whose upstream failed in this run (recorded as blocked)
/// - invoke handlers under a per-node timeout, containing panics
/// - record exactly one [`NodeOutput`] per node in the order
///
/// Failure policy is "fail the branch, not the run": a failed node blocks
/// its dependents within the run's subgraph, while independent branches
/// execute normally. Execution is strictly sequential in resolved order,
/// which satisfies the ordering contract (A fully awaited before B for any
/// edge A -> B) and keeps results deterministic.
#[derive(Debug)]
pub struct ExecutionEngine<'a> {
    graph: &'a GraphDef,
    registry: &'a HandlerRegistry,
    options: EngineOptions,
}

impl<'a> ExecutionEngine<'a> {
    pub fn new(graph: &'a GraphDef, registry: &'a HandlerRegistry, options: EngineOptions) -> Self {
        Self {
            graph,
            registry,
            options,
        }
    }

    /// Execute every node of `order`, producing one output per node.
    pub async fn execute(
        &self,
        order: &[NodeId],
        ctx: Arc<ComputeContext>,
    ) -> BTreeMap<NodeId, NodeOutput> {
        let mut failed: HashSet<NodeId> = HashSet::new();
        let mut outputs: BTreeMap<NodeId, NodeOutput> = BTreeMap::new();

        for node in order {
            // Registry miss wins over blocking: a node without a handler is
            // always recorded as unregistered, even when an upstream already
            // failed in this run.
            let Some(handler) = self.registry.lookup(node.as_str()) else {
                warn!(node = %node, "no handler registered; recording error output");
                failed.insert(node.clone());
                outputs.insert(
                    node.clone(),
                    NodeOutput::failed(NodeFailure::UnregisteredHandler),
                );
                continue;
            };

            if let Some(upstream) = self.failed_upstream(node, &failed) {
                warn!(
                    node = %node,
                    upstream = %upstream,
                    "upstream failed in this run; skipping node"
                );
                failed.insert(node.clone());
                outputs.insert(node.clone(), NodeOutput::failed(NodeFailure::Blocked { upstream }));
                continue;
            }

            let output = self.invoke(handler, node.clone(), Arc::clone(&ctx)).await;
            if !output.is_ok() {
                failed.insert(node.clone());
            }
            outputs.insert(node.clone(), output);
        }

        outputs
    }

    /// First direct upstream of `node` that already failed in this run.
    ///
    /// Only nodes inside the run can be in `failed`, so this is implicitly
    /// restricted to the run's subgraph. Blocked nodes count as failed, so
    /// blocking cascades transitively down a branch, each node referencing
    /// its nearest failed predecessor.
    fn failed_upstream(&self, node: &NodeId, failed: &HashSet<NodeId>) -> Option<NodeId> {
        self.graph
            .upstream_of(node.as_str())
            .find(|up| failed.contains(*up))
            .cloned()
    }

    /// Run one handler on its own tokio task under the per-node timeout.
    ///
    /// Spawning isolates handler panics from the run: a panic surfaces as a
    /// `JoinError` and is recorded as this node's failure instead of
    /// unwinding through the scheduler.
    async fn invoke(
        &self,
        handler: Arc<dyn ComputeHandler>,
        node: NodeId,
        ctx: Arc<ComputeContext>,
    ) -> NodeOutput {
        debug!(node = %node, subject = %ctx.subject(), "invoking compute handler");

        let mut join = tokio::spawn(handler.compute(node.clone(), ctx));

        match tokio::time::timeout(self.options.node_timeout, &mut join).await {
            Err(_elapsed) => {
                join.abort();
                warn!(node = %node, timeout = ?self.options.node_timeout, "handler timed out");
                NodeOutput::failed(NodeFailure::HandlerExecution {
                    reason: FailureReason::Timeout,
                    message: format!(
                        "handler did not complete within {:?}",
                        self.options.node_timeout
                    ),
                })
            }
            Ok(Err(join_err)) => {
                let reason = if join_err.is_panic() {
                    FailureReason::Panic
                } else {
                    FailureReason::Failed
                };
                warn!(node = %node, %reason, "handler task did not finish cleanly");
                NodeOutput::failed(NodeFailure::HandlerExecution {
                    reason,
                    message: join_err.to_string(),
                })
            }
            Ok(Ok(Err(err))) => {
                warn!(node = %node, error = %err, "handler returned an error");
                NodeOutput::failed(NodeFailure::HandlerExecution {
                    reason: FailureReason::Failed,
                    message: format!("{err:#}"),
                })
            }
            Ok(Ok(Ok(details))) => {
                debug!(node = %node, "handler completed successfully");
                NodeOutput::ok(details)
            }
        }
    }
}
