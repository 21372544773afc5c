#![allow(dead_code)]

use calcdag::graph::{Edge, GraphDef, NodeId};

/// Builder for [`GraphDef`] to simplify test setup.
pub struct GraphBuilder {
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(mut self, name: &str) -> Self {
        self.nodes.push(NodeId::from(name));
        self
    }

    pub fn edge(mut self, upstream: &str, downstream: &str) -> Self {
        self.edges.push(Edge::new(upstream, downstream));
        self
    }

    /// Declare `names` in order and chain them with edges:
    /// `chain(&["A", "B", "C"])` declares A, B, C and edges A->B, B->C.
    pub fn chain(mut self, names: &[&str]) -> Self {
        for window in names.windows(2) {
            self.edges.push(Edge::new(window[0], window[1]));
        }
        for name in names {
            self.nodes.push(NodeId::from(*name));
        }
        self
    }

    pub fn build(self) -> GraphDef {
        GraphDef::new(self.nodes, self.edges).expect("Failed to build valid graph from builder")
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The four-node financial chain used throughout the integration tests:
/// Tax -> Compta -> Previsions -> Decideur.
pub fn financial_chain() -> GraphDef {
    GraphBuilder::new()
        .chain(&["Tax", "Compta", "Previsions", "Decideur"])
        .build()
}
