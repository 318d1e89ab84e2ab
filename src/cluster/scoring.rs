//! Pluggable edge-scoring strategies
//!
//! The two clustering strategies differ only in how they answer two
//! questions at a threshold: which incident edges disagree, and whether a
//! vertex is weak. [`DirectScoring`] recomputes both from the graph;
//! [`IndexedScoring`] answers from a prebuilt [`IndexStore`]. The engine
//! itself is strategy-agnostic.

use crate::error::Result;
use crate::graph::{SignedGraph, VertexId};
use crate::index::IndexStore;

/// Strategy interface consumed by the clustering engine.
pub trait EdgeScoring {
    /// Neighbors of `v` whose non-agreement with `v` is `>= eps`, restricted
    /// to ids greater than `v` so each undirected edge is reported exactly
    /// once, at its lower endpoint.
    fn disagreeing_partners(
        &self,
        graph: &SignedGraph,
        v: VertexId,
        eps: f64,
    ) -> Result<Vec<VertexId>>;

    /// Whether `v` is weak (light) at `eps`: fewer than `eps * deg(v)` of
    /// its incident edges agree, or its degree is zero.
    fn is_weak(&self, graph: &SignedGraph, v: VertexId, eps: f64) -> Result<bool>;
}

/// Brute-force strategy: one metric evaluation per incident edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectScoring;

impl EdgeScoring for DirectScoring {
    fn disagreeing_partners(
        &self,
        graph: &SignedGraph,
        v: VertexId,
        eps: f64,
    ) -> Result<Vec<VertexId>> {
        let Some(neighbors) = graph.neighborhood(v)? else {
            return Ok(Vec::new());
        };
        let mut partners = Vec::new();
        for &u in neighbors {
            if u > v && graph.non_agreement(v, u)? >= eps {
                partners.push(u);
            }
        }
        Ok(partners)
    }

    fn is_weak(&self, graph: &SignedGraph, v: VertexId, eps: f64) -> Result<bool> {
        let degree = graph.degree(v)?;
        if degree == 0 {
            return Ok(true);
        }
        let Some(neighbors) = graph.neighborhood(v)? else {
            return Ok(true);
        };
        let mut agreeing = 0u64;
        for &u in neighbors {
            if graph.non_agreement(v, u)? < eps {
                agreeing += 1;
            }
        }
        Ok((agreeing as f64) < eps * degree as f64)
    }
}

/// Index-backed strategy: threshold suffix and order-statistic probes
/// against a ranking index built from the original graph.
#[derive(Debug, Clone)]
pub struct IndexedScoring {
    store: IndexStore,
}

impl IndexedScoring {
    /// Build the store for the graph's current topology.
    pub fn build(graph: &SignedGraph) -> Result<Self> {
        Ok(Self {
            store: IndexStore::build(graph)?,
        })
    }

    /// The backing store.
    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Re-derive the store after the graph topology changed.
    pub fn rebuild(&mut self, graph: &SignedGraph) -> Result<()> {
        self.store.rebuild(graph)
    }
}

impl EdgeScoring for IndexedScoring {
    fn disagreeing_partners(
        &self,
        _graph: &SignedGraph,
        v: VertexId,
        eps: f64,
    ) -> Result<Vec<VertexId>> {
        let Some(index) = self.store.get(v) else {
            return Ok(Vec::new());
        };
        Ok(index
            .disagreeing(eps)
            .iter()
            .filter(|entry| entry.0 > v)
            .map(|entry| entry.0)
            .collect())
    }

    fn is_weak(&self, _graph: &SignedGraph, v: VertexId, eps: f64) -> Result<bool> {
        // an unindexed vertex has no agreeing neighbors
        Ok(self.store.get(v).map_or(true, |index| !index.is_heavy(eps)))
    }
}
