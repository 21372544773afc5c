//! Canned compute handlers for tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use serde_json::json;

use calcdag::engine::ComputeContext;
use calcdag::graph::{GraphDef, NodeId};
use calcdag::registry::{ComputeFuture, ComputeHandler, HandlerRegistry};

/// Shared log of handler invocations, in invocation order.
pub type CallLog = Arc<Mutex<Vec<NodeId>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Snapshot the call log as plain strings for easy assertions.
pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .map(|n| n.as_str().to_string())
        .collect()
}

/// Handler that records its invocation into a [`CallLog`] and succeeds with
/// a small details payload.
pub struct RecordingHandler {
    log: CallLog,
}

impl RecordingHandler {
    pub fn new(log: &CallLog) -> Arc<dyn ComputeHandler> {
        Arc::new(Self {
            log: Arc::clone(log),
        })
    }
}

impl ComputeHandler for RecordingHandler {
    fn compute(&self, node: NodeId, ctx: Arc<ComputeContext>) -> ComputeFuture {
        let log = Arc::clone(&self.log);
        Box::pin(async move {
            log.lock().unwrap().push(node.clone());
            Ok(json!({
                "computed": node.as_str(),
                "subject": ctx.subject(),
            }))
        })
    }
}

/// Handler that always fails with the given message.
pub struct FailingHandler {
    message: String,
    log: Option<CallLog>,
}

impl FailingHandler {
    pub fn new(message: &str) -> Arc<dyn ComputeHandler> {
        Arc::new(Self {
            message: message.to_string(),
            log: None,
        })
    }

    /// Failing handler that still records its invocation into `log`, so
    /// tests can prove the node was invoked before it failed.
    pub fn with_log(message: &str, log: &CallLog) -> Arc<dyn ComputeHandler> {
        Arc::new(Self {
            message: message.to_string(),
            log: Some(Arc::clone(log)),
        })
    }
}

impl ComputeHandler for FailingHandler {
    fn compute(&self, node: NodeId, _ctx: Arc<ComputeContext>) -> ComputeFuture {
        let message = self.message.clone();
        let log = self.log.clone();
        Box::pin(async move {
            if let Some(log) = log {
                log.lock().unwrap().push(node);
            }
            Err(anyhow!(message))
        })
    }
}

/// Handler that sleeps for `delay` before succeeding; used to exercise the
/// per-node timeout.
pub struct SleepyHandler {
    delay: Duration,
}

impl SleepyHandler {
    pub fn new(delay: Duration) -> Arc<dyn ComputeHandler> {
        Arc::new(Self { delay })
    }
}

impl ComputeHandler for SleepyHandler {
    fn compute(&self, node: NodeId, _ctx: Arc<ComputeContext>) -> ComputeFuture {
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(json!({ "computed": node.as_str() }))
        })
    }
}

/// Handler that panics when invoked.
pub struct PanickingHandler;

impl PanickingHandler {
    pub fn new() -> Arc<dyn ComputeHandler> {
        Arc::new(Self)
    }
}

impl ComputeHandler for PanickingHandler {
    fn compute(&self, node: NodeId, _ctx: Arc<ComputeContext>) -> ComputeFuture {
        Box::pin(async move { panic!("handler for '{node}' panicked") })
    }
}

/// Register a [`RecordingHandler`] sharing `log` for every node of `graph`.
pub fn register_recording_handlers(registry: &HandlerRegistry, graph: &GraphDef, log: &CallLog) {
    for node in graph.nodes() {
        registry.register(node.clone(), RecordingHandler::new(log));
    }
}
