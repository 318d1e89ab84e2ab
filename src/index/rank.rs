//! Per-vertex ranking of neighbors by non-agreement
//!
//! The index stores a vertex's neighbors sorted ascending by their
//! non-agreement score, so a threshold query is a binary search for the
//! disagreeing suffix and the heaviness test is a single order-statistic
//! probe instead of a count over the whole neighborhood.

use crate::error::Result;
use crate::graph::{SignedGraph, VertexId};

/// Sorted-by-score ranking of one vertex's positive neighbors.
///
/// Invariant: the entry multiset mirrors the vertex's adjacency list
/// exactly, so the entry count equals the vertex's positive degree.
#[derive(Debug, Clone, PartialEq)]
pub struct RankIndex {
    vertex: VertexId,
    /// `(neighbor, non-agreement)` pairs, ascending by score.
    entries: Vec<(VertexId, f64)>,
}

impl RankIndex {
    /// Build the index for `vertex` from the graph's current state.
    ///
    /// Cost is one non-agreement evaluation per neighbor plus an
    /// `O(deg log deg)` sort. Fails when `vertex` is unknown or removed.
    pub fn build(vertex: VertexId, graph: &SignedGraph) -> Result<Self> {
        graph.degree(vertex)?;
        let mut entries = Vec::new();
        if let Some(neighbors) = graph.neighborhood(vertex)? {
            entries.reserve(neighbors.len());
            for &u in neighbors {
                entries.push((u, graph.non_agreement(u, vertex)?));
            }
        }
        // stable sort keeps equal scores in neighbor-id order
        entries.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(Self { vertex, entries })
    }

    /// The vertex this index ranks the neighbors of.
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// Tracked positive degree; always equals the entry count.
    pub fn degree(&self) -> u64 {
        self.entries.len() as u64
    }

    /// All entries, ascending by score.
    pub fn entries(&self) -> &[(VertexId, f64)] {
        &self.entries
    }

    /// The contiguous suffix of entries whose score is `>= eps`: the
    /// disagreeing neighbors at that threshold. Lower-bound binary search.
    pub fn disagreeing(&self, eps: f64) -> &[(VertexId, f64)] {
        let start = self.entries.partition_point(|entry| entry.1 < eps);
        &self.entries[start..]
    }

    /// Score recorded for `neighbor`, or `None` when it is not currently a
    /// neighbor. Linear scan, since the entries are ordered by score.
    pub fn score_of(&self, neighbor: VertexId) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.0 == neighbor)
            .map(|entry| entry.1)
    }

    /// Whether the vertex is heavy at `eps`: at least a `ceil(eps * deg)`
    /// fraction of its neighbors agree (score `< eps`).
    ///
    /// Answered in O(1) from the order statistic at position
    /// `ceil(eps * deg) - 1`. A degree-0 vertex is always light, as is any
    /// threshold that drives the position below zero.
    pub fn is_heavy(&self, eps: f64) -> bool {
        let deg = self.entries.len();
        if deg == 0 {
            return false;
        }
        let threshold = (eps * deg as f64).ceil() as usize;
        let Some(position) = threshold.checked_sub(1) else {
            return false;
        };
        position < deg && self.entries[position].1 < eps
    }

    /// Record a new incident edge or refresh the score of an existing one.
    ///
    /// An existing entry for `neighbor` is dropped first; the pair is then
    /// inserted at its sorted position by score.
    pub fn update(&mut self, neighbor: VertexId, score: f64) {
        if let Some(position) = self.entries.iter().position(|entry| entry.0 == neighbor) {
            self.entries.remove(position);
        }
        let destination = self.entries.partition_point(|entry| entry.1 < score);
        self.entries.insert(destination, (neighbor, score));
    }

    /// Drop the entry for a removed incident edge; no-op when absent.
    pub fn remove(&mut self, neighbor: VertexId) {
        if let Some(position) = self.entries.iter().position(|entry| entry.0 == neighbor) {
            self.entries.remove(position);
        }
    }
}
