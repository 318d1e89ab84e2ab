//! Plain-text edge-table reading
//!
//! The table format is a header line `n m` (vertex count, declared edge
//! count) followed by one whitespace-separated vertex-id pair per edge,
//! 0-based, undirected. Exactly the declared number of records is read;
//! content past the last record is ignorable trailing whitespace, so a
//! stray final newline can never duplicate the last edge.

use std::fs;
use std::path::Path;
use std::str::SplitWhitespace;

use crate::error::{GraphError, Result};
use crate::graph::SignedGraph;

/// Load a graph from an edge table on disk.
///
/// Open or parse failures map to [`GraphError::InputFormat`]; an edge
/// referencing a vertex outside the declared range propagates as
/// [`GraphError::NotFound`]. Duplicate edge records are collapsed and the
/// shortfall against the declared count is reported as information.
pub fn read_graph_table(path: &Path) -> Result<SignedGraph> {
    let contents = fs::read_to_string(path).map_err(|source| GraphError::InputFormat {
        path: path.display().to_string(),
        reason: source.to_string(),
    })?;
    let (n, m, pairs) = parse_edge_table(&contents).map_err(|reason| GraphError::InputFormat {
        path: path.display().to_string(),
        reason,
    })?;
    let graph = SignedGraph::load_from_table(n, m, pairs)?;
    log::info!(
        "Loaded graph with {} vertices and {} positive edges from {}",
        graph.vertex_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

/// Split the table into the declared counts and exactly `m` edge records.
fn parse_edge_table(contents: &str) -> std::result::Result<(u64, u64, Vec<(u64, u64)>), String> {
    let mut tokens = contents.split_whitespace();
    let n = next_number(&mut tokens, "vertex count")?;
    let m = next_number(&mut tokens, "edge count")?;
    let mut pairs = Vec::with_capacity(m as usize);
    for record in 0..m {
        let u = next_number(&mut tokens, "edge record endpoint")
            .map_err(|reason| format!("{} (record {} of {})", reason, record + 1, m))?;
        let v = next_number(&mut tokens, "edge record endpoint")
            .map_err(|reason| format!("{} (record {} of {})", reason, record + 1, m))?;
        pairs.push((u, v));
    }
    Ok((n, m, pairs))
}

fn next_number(tokens: &mut SplitWhitespace<'_>, what: &str) -> std::result::Result<u64, String> {
    let token = tokens
        .next()
        .ok_or_else(|| format!("unexpected end of input while reading the {}", what))?;
    token
        .parse::<u64>()
        .map_err(|error| format!("invalid {} {:?}: {}", what, token, error))
}
