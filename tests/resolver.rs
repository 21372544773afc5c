// tests/resolver.rs
//
// Topological resolver: closure completeness, declaration-order tie-breaks,
// and subset-restricted edges.

use std::collections::BTreeSet;

use calcdag::errors::CalcdagError;
use calcdag::graph::{NodeId, resolve_order};
use calcdag_test_utils::builders::{GraphBuilder, financial_chain};
use calcdag_test_utils::init_tracing;

fn names(order: &[NodeId]) -> Vec<&str> {
    order.iter().map(|n| n.as_str()).collect()
}

#[test]
fn order_always_starts_with_the_source() {
    init_tracing();
    let graph = financial_chain();
    for source in ["Tax", "Compta", "Previsions", "Decideur"] {
        let order = resolve_order(&graph, source).unwrap();
        assert_eq!(order[0].as_str(), source);
    }
}

#[test]
fn order_matches_downstream_closure_exactly() {
    init_tracing();
    let graph = GraphBuilder::new()
        .node("Tax")
        .node("Compta")
        .node("Previsions")
        .node("Decideur")
        .node("Reporting")
        .edge("Tax", "Compta")
        .edge("Tax", "Previsions")
        .edge("Previsions", "Decideur")
        .build();

    for source in ["Tax", "Compta", "Previsions", "Decideur", "Reporting"] {
        let order = resolve_order(&graph, source).unwrap();
        let closure = graph.downstream_closure(source).unwrap();
        let as_set: BTreeSet<NodeId> = order.iter().cloned().collect();
        assert_eq!(as_set, closure, "closure mismatch from {source}");
        assert_eq!(order.len(), closure.len(), "duplicate nodes from {source}");
    }
}

#[test]
fn ties_break_in_declaration_order() {
    init_tracing();
    // Both branches become ready at the same time after the root; the
    // declared-first node must come first, regardless of edge order.
    let graph = GraphBuilder::new()
        .node("Root")
        .node("First")
        .node("Second")
        .edge("Root", "Second")
        .edge("Root", "First")
        .build();

    let order = resolve_order(&graph, "Root").unwrap();
    assert_eq!(names(&order), ["Root", "First", "Second"]);
}

#[test]
fn repeated_resolution_is_deterministic() {
    init_tracing();
    let graph = GraphBuilder::new()
        .node("A")
        .node("B")
        .node("C")
        .node("D")
        .edge("A", "B")
        .edge("A", "C")
        .edge("B", "D")
        .edge("C", "D")
        .build();

    let first = resolve_order(&graph, "A").unwrap();
    for _ in 0..10 {
        assert_eq!(resolve_order(&graph, "A").unwrap(), first);
    }
}

#[test]
fn unknown_source_is_rejected() {
    init_tracing();
    let graph = financial_chain();
    let err = resolve_order(&graph, "Nope").unwrap_err();
    assert!(matches!(err, CalcdagError::UnknownNode(_)));
}

#[test]
fn edges_within_keeps_only_fully_contained_edges() {
    init_tracing();
    let graph = financial_chain();
    let subset: BTreeSet<NodeId> = ["Compta", "Previsions"]
        .into_iter()
        .map(NodeId::from)
        .collect();

    let edges = graph.edges_within(&subset);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].upstream.as_str(), "Compta");
    assert_eq!(edges[0].downstream.as_str(), "Previsions");
}

#[test]
fn every_edge_in_the_order_points_forward() {
    init_tracing();
    let graph = GraphBuilder::new()
        .node("A")
        .node("B")
        .node("C")
        .node("D")
        .node("E")
        .edge("A", "C")
        .edge("A", "B")
        .edge("B", "E")
        .edge("C", "D")
        .edge("D", "E")
        .build();

    let order = resolve_order(&graph, "A").unwrap();
    let position = |name: &str| order.iter().position(|n| n.as_str() == name).unwrap();
    let subset: BTreeSet<NodeId> = order.iter().cloned().collect();
    for edge in graph.edges_within(&subset) {
        assert!(
            position(edge.upstream.as_str()) < position(edge.downstream.as_str()),
            "edge {} -> {} violated",
            edge.upstream,
            edge.downstream
        );
    }
}
