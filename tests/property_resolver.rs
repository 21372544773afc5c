// tests/property_resolver.rs
//
// Randomized resolver properties over layered DAGs. Acyclicity is guaranteed
// by construction: node N may only depend on nodes 0..N.

use std::collections::{BTreeSet, HashMap, HashSet};

use proptest::prelude::*;

use calcdag::graph::{Edge, GraphDef, NodeId, resolve_order};

/// Strategy generating a valid DAG plus a source index.
///
/// We generate a list of potential-dependency lists and sanitize them so
/// node `i` only depends on earlier nodes, which rules out cycles.
fn graph_and_source(max_nodes: usize) -> impl Strategy<Value = (GraphDef, usize)> {
    (1..=max_nodes)
        .prop_flat_map(move |num_nodes| {
            let deps_strat = proptest::collection::vec(
                proptest::collection::vec(any::<usize>(), 0..max_nodes),
                num_nodes,
            );
            (deps_strat, 0..num_nodes)
        })
        .prop_map(|(raw_deps, source)| {
            let nodes: Vec<NodeId> = (0..raw_deps.len())
                .map(|i| NodeId::from(format!("node_{i}")))
                .collect();

            let mut edges = Vec::new();
            for (i, potential_deps) in raw_deps.iter().enumerate() {
                let mut valid_deps = HashSet::new();
                for dep_idx in potential_deps {
                    if i > 0 {
                        valid_deps.insert(dep_idx % i);
                    }
                }
                for dep_idx in valid_deps {
                    edges.push(Edge::new(format!("node_{dep_idx}"), format!("node_{i}")));
                }
            }

            let graph = GraphDef::new(nodes, edges).expect("layered DAG is always valid");
            (graph, source)
        })
}

proptest! {
    #[test]
    fn order_equals_closure_and_respects_edges((graph, source) in graph_and_source(12)) {
        let source_name = format!("node_{source}");
        let order = resolve_order(&graph, &source_name).unwrap();

        // Begins with the source itself.
        prop_assert_eq!(order[0].as_str(), source_name.as_str());

        // Exactly the downstream closure, no extras, no duplicates.
        let as_set: BTreeSet<NodeId> = order.iter().cloned().collect();
        let closure = graph.downstream_closure(&source_name).unwrap();
        prop_assert_eq!(&as_set, &closure);
        prop_assert_eq!(order.len(), closure.len());

        // Every restricted edge points forward in the order.
        let position: HashMap<&NodeId, usize> =
            order.iter().enumerate().map(|(i, n)| (n, i)).collect();
        for edge in graph.edges_within(&as_set) {
            prop_assert!(position[&edge.upstream] < position[&edge.downstream]);
        }
    }

    #[test]
    fn resolution_is_deterministic((graph, source) in graph_and_source(10)) {
        let source_name = format!("node_{source}");
        let first = resolve_order(&graph, &source_name).unwrap();
        let second = resolve_order(&graph, &source_name).unwrap();
        prop_assert_eq!(first, second);
    }
}
