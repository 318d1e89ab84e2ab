//! Core library for hierarchical correlation clustering of signed graphs
//!
//! A signed graph is represented by its positive (agreement) edges only.
//! Clustering at a disagreement threshold removes disagreeing edges and
//! edges between weak vertices, then takes connected components. The
//! per-vertex ranking indices make repeated threshold queries cheap.

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod index;
pub mod observer;
pub mod storage;

pub use cluster::{
    ClusterAssignment, ClusterId, ClusteringEngine, DirectScoring, EdgeScoring, IndexedScoring,
};
pub use config::AnalysisConfig;
pub use error::{GraphError, Result};
pub use graph::{SignedGraph, VertexId, INVALID_NON_AGREEMENT};
pub use index::{IndexStore, RankIndex};
pub use observer::{LogObserver, StructuralObserver};
