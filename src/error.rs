//! Error taxonomy for graph and clustering operations

use thiserror::Error;

use crate::graph::VertexId;

/// Errors surfaced by the graph, index, and clustering layers.
///
/// Every variant carries the offending vertex or edge and the name of the
/// operation that failed, so callers never need a side channel to recover
/// the context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The referenced vertex id was never allocated.
    #[error("vertex {vertex} was never allocated (during {operation})")]
    NotFound {
        vertex: VertexId,
        operation: &'static str,
    },

    /// The referenced vertex id was allocated but has since been removed.
    #[error("vertex {vertex} has been removed (during {operation})")]
    Removed {
        vertex: VertexId,
        operation: &'static str,
    },

    /// An edge is present on one endpoint's adjacency but not the other's.
    /// This signals corrupted storage and is never recovered from.
    #[error("edge {{{u}, {v}}} is present on only one endpoint's adjacency")]
    InvariantViolation { u: VertexId, v: VertexId },

    /// The input edge table could not be opened or parsed to completion.
    #[error("failed to read edge table {path}: {reason}")]
    InputFormat { path: String, reason: String },
}

/// Convenience alias used throughout the library core.
pub type Result<T> = std::result::Result<T, GraphError>;
