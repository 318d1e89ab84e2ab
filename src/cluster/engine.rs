//! Threshold-query clustering engine
//!
//! Both strategies share the same three-phase contract: delete disagreeing
//! edges from a working copy of the graph, delete edges between two weak
//! vertices (weakness decided on the pre-filter topology), then extract
//! connected components. The strategies must produce identical partitions
//! for identical inputs.

use std::time::Instant;

use crate::cluster::scoring::{DirectScoring, EdgeScoring, IndexedScoring};
use crate::cluster::{ClusterAssignment, ClusterId};
use crate::error::Result;
use crate::graph::{SignedGraph, VertexId};
use crate::index::IndexStore;
use crate::observer::StructuralObserver;

/// Clustering engine generic over the edge-scoring strategy.
///
/// The engine borrows the immutable original graph and clones a private
/// working copy for every query, so queries are stateless and reproducible
/// regardless of call order.
pub struct ClusteringEngine<'g, S> {
    original: &'g SignedGraph,
    scoring: S,
}

impl<'g> ClusteringEngine<'g, DirectScoring> {
    /// Engine that recomputes every score from the graph.
    pub fn direct(graph: &'g SignedGraph) -> Self {
        Self {
            original: graph,
            scoring: DirectScoring,
        }
    }
}

impl<'g> ClusteringEngine<'g, IndexedScoring> {
    /// Engine that answers threshold queries from a ranking-index store
    /// built from the graph's current topology.
    pub fn indexed(graph: &'g SignedGraph) -> Result<Self> {
        Ok(Self {
            original: graph,
            scoring: IndexedScoring::build(graph)?,
        })
    }

    /// The backing index store.
    pub fn index_store(&self) -> &IndexStore {
        self.scoring.store()
    }

    /// Re-derive the index store from the original graph.
    ///
    /// The engine does not detect staleness itself: callers must invoke
    /// this after any change to the graph topology between queries.
    pub fn rebuild_index(&mut self) -> Result<()> {
        self.scoring.rebuild(self.original)
    }
}

impl<'g, S: EdgeScoring> ClusteringEngine<'g, S> {
    /// The immutable original graph this engine was built over.
    pub fn graph(&self) -> &SignedGraph {
        self.original
    }

    /// Cluster assignment of the graph at threshold `eps`.
    ///
    /// Any graph-level error during filtering aborts the query and
    /// propagates.
    pub fn query(&self, eps: f64) -> Result<ClusterAssignment> {
        let started = Instant::now();
        let mut working = self.original.clone();
        self.filter_edges(&mut working, eps)?;
        let assignment = connected_components(&working)?;
        if let Some(observer) = self.original.observer() {
            observer.query_finished(eps, assignment.cluster_count(), started.elapsed());
        }
        Ok(assignment)
    }

    /// Phases 1 and 2: drop disagreeing edges, then edges between two weak
    /// endpoints, from the working copy.
    fn filter_edges(&self, working: &mut SignedGraph, eps: f64) -> Result<()> {
        let original = self.original;

        // phase 1: every edge scoring >= eps, recorded once at its lower
        // endpoint
        let mut disagreeing: Vec<(VertexId, VertexId)> = Vec::new();
        for v in original.live_vertices() {
            for u in self.scoring.disagreeing_partners(original, v, eps)? {
                disagreeing.push((v, u));
            }
        }

        // weakness is decided on the original, pre-filter topology
        let mut weak = vec![false; original.slot_count() as usize];
        for v in original.live_vertices() {
            weak[v as usize] = self.scoring.is_weak(original, v, eps)?;
        }

        for &(u, v) in &disagreeing {
            working.remove_positive_edge(u, v)?;
        }

        // phase 2: edges whose endpoints are both weak, enumerated on the
        // original topology. Each such edge shows up from both sides and
        // may already be gone; the remove no-op absorbs both cases.
        let mut weak_edges: Vec<(VertexId, VertexId)> = Vec::new();
        for v in original.live_vertices() {
            let Some(neighbors) = original.neighborhood(v)? else {
                continue;
            };
            for &u in neighbors {
                if weak[v as usize] && weak[u as usize] {
                    weak_edges.push((v, u));
                }
            }
        }
        for &(u, v) in &weak_edges {
            working.remove_positive_edge(u, v)?;
        }
        Ok(())
    }
}

/// Connected components of the filtered graph by iterative depth-first
/// traversal with an explicit stack.
///
/// Components are seeded from the lowest-id unvisited live vertex, so
/// cluster ids (from 1) depend only on vertex-id order.
fn connected_components(graph: &SignedGraph) -> Result<ClusterAssignment> {
    let slots = graph.slot_count() as usize;
    let mut clusters: Vec<Option<ClusterId>> = vec![None; slots];
    let mut visited = vec![false; slots];
    let mut cluster_count = 0u64;
    let mut stack: Vec<VertexId> = Vec::new();
    for seed in 0..slots {
        if visited[seed] {
            continue;
        }
        if graph.neighborhood(seed as VertexId)?.is_none() {
            // removed vertices take part in no cluster
            visited[seed] = true;
            continue;
        }
        cluster_count += 1;
        stack.push(seed as VertexId);
        while let Some(vertex) = stack.pop() {
            if visited[vertex as usize] {
                continue;
            }
            visited[vertex as usize] = true;
            clusters[vertex as usize] = Some(cluster_count);
            if let Some(neighbors) = graph.neighborhood(vertex)? {
                for &u in neighbors {
                    if !visited[u as usize] {
                        stack.push(u);
                    }
                }
            }
        }
    }
    Ok(ClusterAssignment::new(clusters, cluster_count))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::observer::StructuralObserver;

    use super::*;

    /// Triangle on vertices {0, 1, 2}.
    fn triangle() -> SignedGraph {
        SignedGraph::load_from_table(3, 3, vec![(0, 1), (0, 2), (1, 2)]).unwrap()
    }

    /// Star 0-1, 0-2, 0-3 plus the edge 1-2.
    fn star_plus_edge() -> SignedGraph {
        SignedGraph::load_from_table(4, 4, vec![(0, 1), (0, 2), (0, 3), (1, 2)]).unwrap()
    }

    fn clusters_of(assignment: &ClusterAssignment, vertices: &[VertexId]) -> Vec<ClusterId> {
        vertices
            .iter()
            .map(|&v| assignment.cluster_of(v).expect("vertex must be assigned"))
            .collect()
    }

    #[test]
    fn triangle_above_the_shared_score_is_one_cluster() {
        let graph = triangle();
        // every score is 2/3: nothing disagrees at 0.7 and no vertex is weak
        for assignment in [
            ClusteringEngine::direct(&graph).query(0.7).unwrap(),
            ClusteringEngine::indexed(&graph).unwrap().query(0.7).unwrap(),
        ] {
            assert_eq!(assignment.cluster_count(), 1);
            assert_eq!(clusters_of(&assignment, &[0, 1, 2]), vec![1, 1, 1]);
        }
    }

    #[test]
    fn triangle_below_the_shared_score_shatters_into_singletons() {
        let graph = triangle();
        // every edge disagrees at 0.5, so all three vertices end up alone
        for assignment in [
            ClusteringEngine::direct(&graph).query(0.5).unwrap(),
            ClusteringEngine::indexed(&graph).unwrap().query(0.5).unwrap(),
        ] {
            assert_eq!(assignment.cluster_count(), 3);
            assert_eq!(clusters_of(&assignment, &[0, 1, 2]), vec![1, 2, 3]);
        }
    }

    #[test]
    fn star_leaf_splits_off_at_a_middle_threshold() {
        let graph = star_plus_edge();
        // at 0.8 only the 0-3 edge disagrees (score 1.0); 0 and 3 are weak
        // but share no surviving edge, so the tight trio stays together
        for assignment in [
            ClusteringEngine::direct(&graph).query(0.8).unwrap(),
            ClusteringEngine::indexed(&graph).unwrap().query(0.8).unwrap(),
        ] {
            assert_eq!(assignment.cluster_count(), 2);
            assert_eq!(clusters_of(&assignment, &[0, 1, 2, 3]), vec![1, 1, 1, 2]);
        }
    }

    #[test]
    fn strategies_agree_on_a_path_across_thresholds() {
        let graph = SignedGraph::load_from_table(3, 2, vec![(0, 1), (1, 2)]).unwrap();
        for eps in [0.2, 1.0 / 3.0, 0.4, 0.5, 0.9, 1.99] {
            let direct = ClusteringEngine::direct(&graph).query(eps).unwrap();
            let indexed = ClusteringEngine::indexed(&graph).unwrap().query(eps).unwrap();
            assert_eq!(direct, indexed, "eps = {}", eps);
        }
    }

    #[test]
    fn queries_are_stateless_and_order_independent() {
        let graph = star_plus_edge();
        let engine = ClusteringEngine::direct(&graph);
        let first = engine.query(0.8).unwrap();
        let _ = engine.query(0.5).unwrap();
        let _ = engine.query(1.99).unwrap();
        let again = engine.query(0.8).unwrap();
        assert_eq!(first, again);
        // the original graph is never touched
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn removed_vertices_get_no_cluster() {
        let mut graph = triangle();
        graph.remove_vertex(1).unwrap();
        let engine = ClusteringEngine::indexed(&graph).unwrap();
        let assignment = engine.query(0.7).unwrap();
        assert_eq!(assignment.cluster_of(1), None);
        assert_eq!(assignment.assigned_count(), 2);
        let direct = ClusteringEngine::direct(&graph).query(0.7).unwrap();
        assert_eq!(assignment, direct);
    }

    #[test]
    fn isolated_vertices_become_singleton_clusters() {
        let mut graph = SignedGraph::load_from_table(2, 1, vec![(0, 1)]).unwrap();
        graph.add_vertex();
        let assignment = ClusteringEngine::direct(&graph).query(1.99).unwrap();
        // at 1.99 nothing disagrees, but both endpoints of 0-1 are weak
        // (scores 0.5 each, 1 agreeing < 1.99): the pair splits
        assert_eq!(assignment.cluster_count(), 3);
        assert_eq!(clusters_of(&assignment, &[0, 1, 2]), vec![1, 2, 3]);
    }

    #[test]
    fn rebuild_index_tracks_topology_changes() {
        let mut graph = star_plus_edge();
        let direct_before = ClusteringEngine::direct(&graph).query(0.8).unwrap();
        {
            let engine = ClusteringEngine::indexed(&graph).unwrap();
            assert_eq!(engine.query(0.8).unwrap(), direct_before);
        }
        graph.remove_positive_edge(0, 3).unwrap();
        let mut engine = ClusteringEngine::indexed(&graph).unwrap();
        engine.rebuild_index().unwrap();
        let direct_after = ClusteringEngine::direct(&graph).query(0.8).unwrap();
        assert_eq!(engine.query(0.8).unwrap(), direct_after);
    }

    #[test]
    fn query_completion_is_reported_to_the_observer() {
        #[derive(Default)]
        struct Queries(AtomicU64);
        impl StructuralObserver for Queries {
            fn query_finished(&self, _eps: f64, _clusters: u64, _elapsed: Duration) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let observer = Arc::new(Queries::default());
        let mut graph = triangle();
        graph.set_observer(observer.clone());
        let engine = ClusteringEngine::direct(&graph);
        engine.query(0.7).unwrap();
        engine.query(0.5).unwrap();
        assert_eq!(observer.0.load(Ordering::SeqCst), 2);
    }
}
