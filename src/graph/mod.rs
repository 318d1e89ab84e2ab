//! Signed graph representation module

pub mod signed;

pub use signed::{SignedGraph, VertexId, INVALID_NON_AGREEMENT};
