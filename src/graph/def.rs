// src/graph/def.rs

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcdagError, Result};

/// Identifier of one calculation node.
///
/// Node ids are plain validated strings; the [`GraphDef`] they were declared
/// in is the single source of truth for which ids are valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A directed edge: `downstream` must be recomputed after `upstream` when
/// both appear in the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub upstream: NodeId,
    pub downstream: NodeId,
}

impl Edge {
    pub fn new(upstream: impl Into<NodeId>, downstream: impl Into<NodeId>) -> Self {
        Self {
            upstream: upstream.into(),
            downstream: downstream.into(),
        }
    }
}

/// Validated, immutable graph of calculation nodes.
///
/// Declared once at process start; never mutated afterwards. Declaration
/// order of nodes is preserved because it is the deterministic tie-break key
/// used by the resolver.
///
/// All structural validation happens in [`GraphDef::new`]:
/// - no duplicate node declarations
/// - every edge endpoint refers to a declared node
/// - no self-edges
/// - the whole edge set is acyclic
///
/// Any violation is a fatal configuration error, not a runtime error.
#[derive(Debug, Clone)]
pub struct GraphDef {
    /// Nodes in declaration order.
    nodes: Vec<NodeId>,
    /// Node name -> declaration index.
    index: HashMap<NodeId, usize>,
    /// Forward adjacency: `downstream[i]` are the direct dependents of node `i`.
    downstream: Vec<Vec<usize>>,
    /// Reverse adjacency: `upstream[i]` are the direct dependencies of node `i`.
    upstream: Vec<Vec<usize>>,
}

impl GraphDef {
    /// Build and validate a graph from declared nodes and edges.
    pub fn new(nodes: Vec<NodeId>, edges: Vec<Edge>) -> Result<Self> {
        let mut index: HashMap<NodeId, usize> = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.clone(), i).is_some() {
                return Err(CalcdagError::ConfigError(format!(
                    "node '{node}' is declared more than once"
                )));
            }
        }

        let mut downstream = vec![Vec::new(); nodes.len()];
        let mut upstream = vec![Vec::new(); nodes.len()];

        for edge in &edges {
            let up = *index.get(&edge.upstream).ok_or_else(|| {
                CalcdagError::ConfigError(format!(
                    "edge '{}' -> '{}' references undeclared node '{}'",
                    edge.upstream, edge.downstream, edge.upstream
                ))
            })?;
            let down = *index.get(&edge.downstream).ok_or_else(|| {
                CalcdagError::ConfigError(format!(
                    "edge '{}' -> '{}' references undeclared node '{}'",
                    edge.upstream, edge.downstream, edge.downstream
                ))
            })?;
            if up == down {
                return Err(CalcdagError::ConfigError(format!(
                    "node '{}' cannot depend on itself",
                    edge.upstream
                )));
            }
            downstream[up].push(down);
            upstream[down].push(up);
        }

        let graph = Self {
            nodes,
            index,
            downstream,
            upstream,
        };
        graph.ensure_acyclic()?;
        Ok(graph)
    }

    /// Cycle check over the *entire* graph, once at construction time.
    ///
    /// A topological sort over the full edge set fails exactly when there is
    /// a cycle, so the resolver never needs a runtime cycle check.
    fn ensure_acyclic(&self) -> Result<()> {
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

        for i in 0..self.nodes.len() {
            graph.add_node(i);
        }
        for (i, dependents) in self.downstream.iter().enumerate() {
            for &j in dependents {
                graph.add_edge(i, j, ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => {
                let node = &self.nodes[cycle.node_id()];
                Err(CalcdagError::GraphCycle(format!(
                    "cycle detected in calculation graph involving node '{node}'"
                )))
            }
        }
    }

    /// All node ids, in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.index.contains_key(node)
    }

    /// Declaration index of a node, used as the resolver's tie-break key.
    pub(crate) fn index_of(&self, node: &str) -> Option<usize> {
        self.index.get(node).copied()
    }

    pub(crate) fn node_at(&self, index: usize) -> &NodeId {
        &self.nodes[index]
    }

    pub(crate) fn downstream_indices(&self, index: usize) -> &[usize] {
        &self.downstream[index]
    }

    /// Direct dependents of a node. Empty for unknown nodes.
    pub fn downstream_of(&self, node: &str) -> impl Iterator<Item = &NodeId> {
        self.index
            .get(node)
            .into_iter()
            .flat_map(move |&i| self.downstream[i].iter().map(move |&j| &self.nodes[j]))
    }

    /// Direct dependencies of a node. Empty for unknown nodes.
    pub fn upstream_of(&self, node: &str) -> impl Iterator<Item = &NodeId> {
        self.index
            .get(node)
            .into_iter()
            .flat_map(move |&i| self.upstream[i].iter().map(move |&j| &self.nodes[j]))
    }

    /// Membership mask over declaration indices of every node reachable from
    /// `start` via forward edges, including `start` itself.
    pub(crate) fn closure_mask(&self, start: usize) -> Vec<bool> {
        let mut mask = vec![false; self.nodes.len()];
        let mut stack = vec![start];

        while let Some(i) = stack.pop() {
            if mask[i] {
                continue;
            }
            mask[i] = true;
            stack.extend(self.downstream[i].iter().copied());
        }

        mask
    }

    /// Set of nodes reachable from `node` via forward edges, inclusive.
    pub fn downstream_closure(&self, node: &str) -> Result<BTreeSet<NodeId>> {
        let start = self
            .index_of(node)
            .ok_or_else(|| CalcdagError::UnknownNode(NodeId::from(node)))?;

        let mask = self.closure_mask(start);
        Ok(mask
            .iter()
            .enumerate()
            .filter(|&(_, &in_closure)| in_closure)
            .map(|(i, _)| self.nodes[i].clone())
            .collect())
    }

    /// All declared edges, in declaration order of their upstream node.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.downstream.iter().enumerate().flat_map(move |(i, deps)| {
            deps.iter()
                .map(move |&j| Edge::new(self.nodes[i].clone(), self.nodes[j].clone()))
        })
    }

    /// The declared edge set restricted to a subset of nodes: only edges with
    /// both endpoints inside `subset` are kept.
    pub fn edges_within(&self, subset: &BTreeSet<NodeId>) -> Vec<Edge> {
        self.edges()
            .filter(|e| subset.contains(&e.upstream) && subset.contains(&e.downstream))
            .collect()
    }
}
