//! Collection of ranking indices for a graph snapshot

use rayon::prelude::*;

use crate::error::Result;
use crate::graph::{SignedGraph, VertexId};
use crate::index::RankIndex;

/// One [`RankIndex`] per live vertex of a graph snapshot.
///
/// The store is valid only for the topology it was built from: any graph
/// mutation not mirrored through [`RankIndex::update`] /
/// [`RankIndex::remove`] on the affected indices invalidates it, and the
/// owner must call [`IndexStore::rebuild`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStore {
    /// One slot per allocated vertex id; `None` for removed vertices.
    indices: Vec<Option<RankIndex>>,
}

impl IndexStore {
    /// Build an index for every live vertex of `graph`.
    ///
    /// The per-vertex builds are independent, so they run as an
    /// order-preserving parallel map; the result is identical to a
    /// sequential build.
    pub fn build(graph: &SignedGraph) -> Result<Self> {
        let indices = (0..graph.slot_count())
            .into_par_iter()
            .map(|v| match graph.neighborhood(v)? {
                None => Ok(None),
                Some(_) => RankIndex::build(v, graph).map(Some),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { indices })
    }

    /// Discard all indices and reconstruct them from the graph's current
    /// state.
    pub fn rebuild(&mut self, graph: &SignedGraph) -> Result<()> {
        *self = Self::build(graph)?;
        Ok(())
    }

    /// The index for vertex `v`, or `None` when `v` is removed or was
    /// never allocated.
    pub fn get(&self, v: VertexId) -> Option<&RankIndex> {
        self.indices.get(v as usize).and_then(|slot| slot.as_ref())
    }

    /// Mutable access for incremental maintenance.
    pub fn get_mut(&mut self, v: VertexId) -> Option<&mut RankIndex> {
        self.indices.get_mut(v as usize).and_then(|slot| slot.as_mut())
    }

    /// Number of live indices.
    pub fn len(&self) -> usize {
        self.indices.iter().flatten().count()
    }

    /// Whether the store holds no live index.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occurrence count of every distinct non-agreement score across all
    /// indices, ascending by score. Each edge contributes once per
    /// endpoint.
    pub fn score_distribution(&self) -> Vec<(f64, u64)> {
        let mut scores: Vec<f64> = self
            .indices
            .iter()
            .flatten()
            .flat_map(|index| index.entries().iter().map(|entry| entry.1))
            .collect();
        scores.sort_by(f64::total_cmp);
        let mut distribution: Vec<(f64, u64)> = Vec::new();
        for score in scores {
            match distribution.last_mut() {
                Some((value, count)) if *value == score => *count += 1,
                _ => distribution.push((score, 1)),
            }
        }
        distribution
    }
}
