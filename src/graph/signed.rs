//! Positive-edge representation of a complete signed graph
//!
//! Only the agreement side of the signed graph is materialized: a missing
//! edge between two live vertices is an implicit disagreement edge. Each
//! vertex slot holds a sorted adjacency list, which enables binary-search
//! membership tests and a linear-merge non-agreement computation.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{GraphError, Result};
use crate::observer::StructuralObserver;

/// Dense vertex identifier, assigned at creation time and never reused.
pub type VertexId = u64;

/// Sentinel returned by [`SignedGraph::non_agreement`] for a self pair or a
/// pair not joined by a positive edge. Outside the valid range `[0, 2]`.
pub const INVALID_NON_AGREEMENT: f64 = 5.0;

/// Undirected positive-edge graph with sorted adjacency lists.
///
/// Vertex ids are 0-based and monotonically increasing. A removed vertex
/// keeps its slot as a tombstone, so queries against a removed id fail
/// differently from queries against an id that was never allocated.
#[derive(Clone, Default)]
pub struct SignedGraph {
    /// One slot per allocated id; `None` marks a removed vertex.
    adjacency: Vec<Option<Vec<VertexId>>>,

    /// Number of live (non-removed) vertices.
    vertex_count: u64,

    /// Number of positive edges.
    edge_count: u64,

    /// Optional receiver for structural events. Clones share the handle.
    observer: Option<Arc<dyn StructuralObserver>>,
}

impl SignedGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an observer to be notified of structural mutations.
    pub fn set_observer(&mut self, observer: Arc<dyn StructuralObserver>) {
        self.observer = Some(observer);
    }

    /// The observer installed on this graph, if any.
    pub fn observer(&self) -> Option<&Arc<dyn StructuralObserver>> {
        self.observer.as_ref()
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> u64 {
        self.vertex_count
    }

    /// Number of positive edges.
    pub fn edge_count(&self) -> u64 {
        self.edge_count
    }

    /// Number of allocated vertex slots, including tombstones. Vertex ids
    /// are always smaller than this bound.
    pub fn slot_count(&self) -> u64 {
        self.adjacency.len() as u64
    }

    /// Iterator over the ids of all live vertices, in increasing order.
    pub fn live_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|_| id as VertexId))
    }

    /// Allocate the next unused vertex id with an empty adjacency list.
    pub fn add_vertex(&mut self) -> VertexId {
        let id = self.adjacency.len() as VertexId;
        self.adjacency.push(Some(Vec::new()));
        self.vertex_count += 1;
        if let Some(observer) = &self.observer {
            observer.vertex_added(id);
        }
        id
    }

    /// Remove a vertex and every positive edge incident to it.
    ///
    /// Removing an already-removed vertex is a no-op; removing a vertex that
    /// was never allocated fails with [`GraphError::NotFound`].
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<()> {
        let slot = self
            .adjacency
            .get_mut(v as usize)
            .ok_or(GraphError::NotFound {
                vertex: v,
                operation: "remove_vertex",
            })?;
        let Some(neighbors) = slot.take() else {
            // already removed
            return Ok(());
        };
        // v's own slot is vacated above, so only the partner lists need
        // scrubbing. A partner that does not know about v means the
        // adjacency storage is corrupt.
        for &u in &neighbors {
            match self.neighbor_position(u, v, "remove_vertex")? {
                Some(position) => {
                    if let Some(Some(list)) = self.adjacency.get_mut(u as usize) {
                        list.remove(position);
                    }
                    self.edge_count -= 1;
                    if let Some(observer) = &self.observer {
                        observer.edge_removed(u, v);
                    }
                }
                None => return Err(GraphError::InvariantViolation { u, v }),
            }
        }
        self.vertex_count -= 1;
        if let Some(observer) = &self.observer {
            observer.vertex_removed(v);
        }
        Ok(())
    }

    /// Insert the positive edge `{u, v}`.
    ///
    /// A self pair or an already-present edge is a no-op. Both endpoints
    /// must be live.
    pub fn add_positive_edge(&mut self, u: VertexId, v: VertexId) -> Result<()> {
        // validate both endpoints up front so the error names the right one
        self.live_list(u, "add_positive_edge")?;
        self.live_list(v, "add_positive_edge")?;
        if u == v || self.is_neighbor(u, v)? {
            return Ok(());
        }
        insert_sorted(self.live_list_mut(u, "add_positive_edge")?, v);
        insert_sorted(self.live_list_mut(v, "add_positive_edge")?, u);
        self.edge_count += 1;
        if let Some(observer) = &self.observer {
            observer.edge_added(u, v);
        }
        Ok(())
    }

    /// Remove the positive edge `{u, v}`.
    ///
    /// Removing an edge that is absent from both adjacency lists is a
    /// no-op. An edge present on only one side signals corrupted storage
    /// and fails with [`GraphError::InvariantViolation`].
    pub fn remove_positive_edge(&mut self, u: VertexId, v: VertexId) -> Result<()> {
        let v_in_u = self.neighbor_position(u, v, "remove_positive_edge")?;
        let u_in_v = self.neighbor_position(v, u, "remove_positive_edge")?;
        match (v_in_u, u_in_v) {
            (Some(position_in_u), Some(position_in_v)) => {
                if let Some(Some(list)) = self.adjacency.get_mut(u as usize) {
                    list.remove(position_in_u);
                }
                if let Some(Some(list)) = self.adjacency.get_mut(v as usize) {
                    list.remove(position_in_v);
                }
                self.edge_count -= 1;
                if let Some(observer) = &self.observer {
                    observer.edge_removed(u, v);
                }
                Ok(())
            }
            (None, None) => Ok(()),
            _ => Err(GraphError::InvariantViolation { u, v }),
        }
    }

    /// Positive degree of a live vertex.
    ///
    /// Fails with [`GraphError::NotFound`] for a never-allocated id and
    /// [`GraphError::Removed`] for a tombstoned one.
    pub fn degree(&self, v: VertexId) -> Result<u64> {
        match self.adjacency.get(v as usize) {
            None => Err(GraphError::NotFound {
                vertex: v,
                operation: "degree",
            }),
            Some(None) => Err(GraphError::Removed {
                vertex: v,
                operation: "degree",
            }),
            Some(Some(list)) => Ok(list.len() as u64),
        }
    }

    /// Read-only sorted view of a vertex's positive neighborhood.
    ///
    /// Returns `Ok(None)` for a removed vertex so callers can test "is this
    /// vertex gone" cheaply; a never-allocated id fails with
    /// [`GraphError::NotFound`].
    pub fn neighborhood(&self, v: VertexId) -> Result<Option<&[VertexId]>> {
        self.view(v, "neighborhood")
    }

    /// Binary-search membership test over `v`'s sorted adjacency.
    ///
    /// A removed vertex has no neighbors.
    pub fn is_neighbor(&self, v: VertexId, query: VertexId) -> Result<bool> {
        match self.view(v, "is_neighbor")? {
            None => Ok(false),
            Some(list) => Ok(list.binary_search(&query).is_ok()),
        }
    }

    /// Non-agreement score of the pair `{u, v}`.
    ///
    /// Defined only when the two vertices are joined by a positive edge:
    /// with `I = |N(u) ∩ N(v)|`, the score is
    /// `(deg(u) + deg(v) - 2*I) / (max(deg(u), deg(v)) + 1)`, in `[0, 2]`.
    /// For a self pair or a non-adjacent pair (including pairs with a
    /// removed endpoint) the [`INVALID_NON_AGREEMENT`] sentinel is returned.
    pub fn non_agreement(&self, u: VertexId, v: VertexId) -> Result<f64> {
        let neigh_u = self.view(u, "non_agreement")?;
        let neigh_v = self.view(v, "non_agreement")?;
        let (Some(neigh_u), Some(neigh_v)) = (neigh_u, neigh_v) else {
            return Ok(INVALID_NON_AGREEMENT);
        };
        if u == v || neigh_u.binary_search(&v).is_err() {
            return Ok(INVALID_NON_AGREEMENT);
        }
        let deg_u = neigh_u.len() as u64;
        let deg_v = neigh_v.len() as u64;
        let shared = count_shared(neigh_u, neigh_v);
        let larger = deg_u.max(deg_v);
        Ok((deg_u + deg_v - 2 * shared) as f64 / (larger + 1) as f64)
    }

    /// Initialize a graph with `n` vertices and the supplied edge pairs.
    ///
    /// Duplicate pairs in the source are absorbed by the add's
    /// existing-edge no-op, so the final edge count may be smaller than the
    /// declared one; the shortfall is reported as information, not an
    /// error.
    pub fn load_from_table(
        n: u64,
        declared_edges: u64,
        pairs: impl IntoIterator<Item = (VertexId, VertexId)>,
    ) -> Result<Self> {
        let mut graph = Self::new();
        graph.adjacency.reserve(n as usize);
        for _ in 0..n {
            graph.add_vertex();
        }
        for (u, v) in pairs {
            graph.add_positive_edge(u, v)?;
        }
        if graph.edge_count != declared_edges {
            log::info!(
                "Edge table declared {} edges but {} were distinct (duplicates collapsed)",
                declared_edges,
                graph.edge_count
            );
        }
        Ok(graph)
    }

    /// Neighborhood view with the failing operation's name preserved.
    fn view(&self, v: VertexId, operation: &'static str) -> Result<Option<&[VertexId]>> {
        self.adjacency
            .get(v as usize)
            .map(|slot| slot.as_deref())
            .ok_or(GraphError::NotFound {
                vertex: v,
                operation,
            })
    }

    /// Adjacency list of a live vertex, or the matching error.
    fn live_list(&self, v: VertexId, operation: &'static str) -> Result<&[VertexId]> {
        match self.adjacency.get(v as usize) {
            None => Err(GraphError::NotFound {
                vertex: v,
                operation,
            }),
            Some(None) => Err(GraphError::Removed {
                vertex: v,
                operation,
            }),
            Some(Some(list)) => Ok(list),
        }
    }

    /// Mutable adjacency list of a live vertex, or the matching error.
    fn live_list_mut(&mut self, v: VertexId, operation: &'static str) -> Result<&mut Vec<VertexId>> {
        match self.adjacency.get_mut(v as usize) {
            None => Err(GraphError::NotFound {
                vertex: v,
                operation,
            }),
            Some(None) => Err(GraphError::Removed {
                vertex: v,
                operation,
            }),
            Some(Some(list)) => Ok(list),
        }
    }

    /// Position of `query` in `v`'s adjacency list, `None` when absent.
    /// A removed vertex counts as having an empty list.
    fn neighbor_position(
        &self,
        v: VertexId,
        query: VertexId,
        operation: &'static str,
    ) -> Result<Option<usize>> {
        match self.view(v, operation)? {
            None => Ok(None),
            Some(list) => Ok(list.binary_search(&query).ok()),
        }
    }
}

impl fmt::Debug for SignedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedGraph")
            .field("vertex_count", &self.vertex_count)
            .field("edge_count", &self.edge_count)
            .field("slot_count", &self.adjacency.len())
            .finish()
    }
}

/// Ordered insertion into a sorted list; duplicates are ignored.
fn insert_sorted(list: &mut Vec<VertexId>, value: VertexId) {
    if let Err(position) = list.binary_search(&value) {
        list.insert(position, value);
    }
}

/// Size of the intersection of two sorted id lists, by linear merge.
fn count_shared(a: &[VertexId], b: &[VertexId]) -> u64 {
    let mut i = 0;
    let mut j = 0;
    let mut shared = 0u64;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
        }
    }
    shared
}
