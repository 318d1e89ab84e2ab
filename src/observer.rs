//! Injectable observer for structural events
//!
//! The graph and the clustering engines notify an observer of structural
//! mutations and query completions instead of logging from inside the
//! algorithms. Install [`LogObserver`] to forward events to the `log`
//! facade, or a custom implementation to collect statistics.

use std::time::Duration;

use crate::graph::VertexId;

/// Receiver for structural events emitted by the core.
///
/// All methods have empty default bodies so implementations only override
/// the events they care about. Implementations must be `Send + Sync`: the
/// observer handle is shared by cloned working graphs and may be consulted
/// from the parallel index build.
pub trait StructuralObserver: Send + Sync {
    /// A vertex was allocated.
    fn vertex_added(&self, _vertex: VertexId) {}

    /// A vertex was removed (tombstoned).
    fn vertex_removed(&self, _vertex: VertexId) {}

    /// A positive edge was inserted.
    fn edge_added(&self, _u: VertexId, _v: VertexId) {}

    /// A positive edge was removed.
    fn edge_removed(&self, _u: VertexId, _v: VertexId) {}

    /// A clustering query finished.
    fn query_finished(&self, _eps: f64, _cluster_count: u64, _elapsed: Duration) {}
}

/// Observer that forwards events to the `log` facade.
///
/// Mutations are reported at debug level (they can be very frequent during
/// edge filtering), query completions at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StructuralObserver for LogObserver {
    fn vertex_added(&self, vertex: VertexId) {
        log::debug!("Vertex {} added", vertex);
    }

    fn vertex_removed(&self, vertex: VertexId) {
        log::debug!("Vertex {} removed", vertex);
    }

    fn edge_added(&self, u: VertexId, v: VertexId) {
        log::debug!("Positive edge {{{}, {}}} added", u, v);
    }

    fn edge_removed(&self, u: VertexId, v: VertexId) {
        log::debug!("Positive edge {{{}, {}}} removed", u, v);
    }

    fn query_finished(&self, eps: f64, cluster_count: u64, elapsed: Duration) {
        log::info!(
            "Query at eps = {} produced {} clusters in {} ms",
            eps,
            cluster_count,
            elapsed.as_millis()
        );
    }
}
