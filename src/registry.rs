// src/registry.rs

//! Pluggable compute-handler registry.
//!
//! The registry maps node ids to the async handlers that perform the actual
//! domain computations (tax, ledger aggregation, forecasting, ...). It is
//! deliberately separate from the graph definition: a node may be declared
//! in the graph without a handler, which is a valid degenerate state whose
//! run output becomes an `UnregisteredHandlerError`.
//!
//! The registry is an explicit object injected into the scheduler, not
//! ambient global state, so independent graphs and registries can coexist
//! in one process and tests stay isolated.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::engine::ComputeContext;
use crate::graph::NodeId;

/// Boxed future returned by a compute handler.
pub type ComputeFuture =
    Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static>>;

/// A single node's domain computation.
///
/// Handlers are opaque to the scheduler: each one receives the node id it
/// was invoked for plus the shared per-run context, performs arbitrary
/// async work, and returns an opaque JSON details payload. Returning `Err`
/// marks the node failed and blocks its dependents in the same run.
pub trait ComputeHandler: Send + Sync {
    fn compute(&self, node: NodeId, ctx: Arc<ComputeContext>) -> ComputeFuture;
}

/// Adapter so plain async closures can be registered as handlers.
struct FnHandler<F>(F);

impl<F, Fut> ComputeHandler for FnHandler<F>
where
    F: Fn(NodeId, Arc<ComputeContext>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
{
    fn compute(&self, node: NodeId, ctx: Arc<ComputeContext>) -> ComputeFuture {
        Box::pin((self.0)(node, ctx))
    }
}

/// Mapping from node id to registered compute handler.
///
/// Written rarely (startup wiring, test setup), read once per node per run.
/// A coarse lock serialises mutation; lookups clone the handler `Arc` out so
/// the lock is never held across a handler invocation.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Mutex<HashMap<NodeId, Arc<dyn ComputeHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the handler for `node`.
    ///
    /// Subsequent runs touching this node use the new handler immediately;
    /// there is no versioning.
    pub fn register(&self, node: impl Into<NodeId>, handler: Arc<dyn ComputeHandler>) {
        let node = node.into();
        debug!(node = %node, "registering compute handler");
        self.lock().insert(node, handler);
    }

    /// Register an async closure as the handler for `node`.
    pub fn register_fn<F, Fut>(&self, node: impl Into<NodeId>, f: F)
    where
        F: Fn(NodeId, Arc<ComputeContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<serde_json::Value>> + Send + 'static,
    {
        self.register(node, Arc::new(FnHandler(f)));
    }

    /// Clear all registrations.
    ///
    /// Intended for test isolation or controlled reconfiguration during a
    /// quiescent period; not for use while a run is in flight.
    pub fn reset(&self) {
        debug!("resetting handler registry");
        self.lock().clear();
    }

    /// Handler registered for `node`, if any. Never fails.
    pub fn lookup(&self, node: &str) -> Option<Arc<dyn ComputeHandler>> {
        self.lock().get(node).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<NodeId, Arc<dyn ComputeHandler>>> {
        // A poisoned lock only means another thread panicked mid-mutation of
        // a plain HashMap; the map itself is still coherent.
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("registered", &self.lock().len())
            .finish()
    }
}
