//! Cross-strategy equivalence of the clustering engines
//!
//! The direct and index-based strategies must return the same cluster
//! assignment for the same graph and threshold, for every threshold. The
//! graphs here are seeded, so failures reproduce exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use correlation_cluster_analyzer::{ClusterAssignment, ClusteringEngine, SignedGraph};

const THRESHOLDS: [f64; 10] = [
    0.1,
    0.3,
    0.5,
    2.0 / 3.0,
    0.7,
    0.75,
    0.8,
    1.0,
    1.25,
    1.99,
];

fn random_graph(rng: &mut StdRng, n: u64, edge_probability: f64) -> SignedGraph {
    let mut graph = SignedGraph::new();
    for _ in 0..n {
        graph.add_vertex();
    }
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.gen_bool(edge_probability) {
                graph.add_positive_edge(u, v).unwrap();
            }
        }
    }
    graph
}

/// Every live vertex is assigned and cluster ids are contiguous from 1 in
/// discovery order.
fn assert_wellformed(graph: &SignedGraph, assignment: &ClusterAssignment) {
    let mut highest = 0;
    for v in graph.live_vertices() {
        let cluster = assignment
            .cluster_of(v)
            .expect("every live vertex must be assigned");
        assert!(cluster >= 1);
        assert!(cluster <= assignment.cluster_count());
        if cluster > highest {
            assert_eq!(cluster, highest + 1, "cluster ids must appear in order");
            highest = cluster;
        }
    }
    assert_eq!(highest, assignment.cluster_count());
}

#[test]
fn strategies_agree_on_random_graphs() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in [1, 2, 8, 25, 60] {
        for edge_probability in [0.05, 0.2, 0.6] {
            let graph = random_graph(&mut rng, n, edge_probability);
            let direct = ClusteringEngine::direct(&graph);
            let indexed = ClusteringEngine::indexed(&graph).unwrap();
            for eps in THRESHOLDS {
                let direct_assignment = direct.query(eps).unwrap();
                let indexed_assignment = indexed.query(eps).unwrap();
                assert_eq!(
                    direct_assignment, indexed_assignment,
                    "n = {}, p = {}, eps = {}",
                    n, edge_probability, eps
                );
                assert_wellformed(&graph, &direct_assignment);
            }
        }
    }
}

#[test]
fn strategies_agree_after_vertex_removals() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut graph = random_graph(&mut rng, 30, 0.3);
    for v in [4, 11, 29] {
        graph.remove_vertex(v).unwrap();
    }
    let direct = ClusteringEngine::direct(&graph);
    let indexed = ClusteringEngine::indexed(&graph).unwrap();
    for eps in THRESHOLDS {
        let direct_assignment = direct.query(eps).unwrap();
        let indexed_assignment = indexed.query(eps).unwrap();
        assert_eq!(direct_assignment, indexed_assignment, "eps = {}", eps);
        assert_wellformed(&graph, &direct_assignment);
        for v in [4, 11, 29] {
            assert_eq!(direct_assignment.cluster_of(v), None);
        }
    }
}

#[test]
fn repeated_queries_are_byte_identical() {
    let mut rng = StdRng::seed_from_u64(99);
    let graph = random_graph(&mut rng, 40, 0.25);
    let indexed = ClusteringEngine::indexed(&graph).unwrap();
    for eps in THRESHOLDS {
        let first = indexed.query(eps).unwrap();
        let second = indexed.query(eps).unwrap();
        assert_eq!(first, second, "eps = {}", eps);
    }
    // a separately built engine sees the same partitions
    let rebuilt = ClusteringEngine::indexed(&graph).unwrap();
    for eps in THRESHOLDS {
        assert_eq!(indexed.query(eps).unwrap(), rebuilt.query(eps).unwrap());
    }
}

#[test]
fn original_graph_is_untouched_by_queries() {
    let mut rng = StdRng::seed_from_u64(5);
    let graph = random_graph(&mut rng, 20, 0.4);
    let edges_before = graph.edge_count();
    let engine = ClusteringEngine::direct(&graph);
    for eps in THRESHOLDS {
        engine.query(eps).unwrap();
    }
    assert_eq!(graph.edge_count(), edges_before);
}
