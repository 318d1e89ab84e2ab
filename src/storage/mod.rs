//! Results persistence module

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, to_string_pretty};

use crate::cluster::ClusterAssignment;
use crate::graph::SignedGraph;

/// Timing and outcome of one threshold query pair, for the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub eps: f64,
    pub cluster_count: u64,
    pub direct_millis: u128,
    pub indexed_millis: u128,
}

/// Write a cluster assignment as a `<vertex_id>\t<cluster_id>` table,
/// vertex ids ascending. Removed vertices have no cluster and no line.
pub fn write_assignment(path: &Path, assignment: &ClusterAssignment) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for (vertex, cluster) in assignment.iter() {
        writeln!(file, "{}\t{}", vertex, cluster)?;
    }
    Ok(())
}

/// Write a score distribution as a `<score>\t<occurrence_count>` table,
/// ascending by score.
pub fn write_distribution(path: &Path, distribution: &[(f64, u64)]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for &(score, count) in distribution {
        writeln!(file, "{}\t{}", score, count)?;
    }
    Ok(())
}

/// Write the run summary next to the result tables.
pub fn write_summary(path: &Path, graph: &SignedGraph, runs: &[RunRecord]) -> Result<()> {
    log::info!("Saving run summary to {}", path.display());

    let avg_degree = if graph.vertex_count() == 0 {
        0.0
    } else {
        2.0 * graph.edge_count() as f64 / graph.vertex_count() as f64
    };
    let summary = json!({
        "graph_stats": {
            "vertex_count": graph.vertex_count(),
            "edge_count": graph.edge_count(),
            "avg_degree": avg_degree,
        },
        "runs": runs,
    });

    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cluster::ClusteringEngine;

    use super::*;

    #[test]
    fn assignment_table_is_tab_separated_and_ascending() {
        let graph =
            SignedGraph::load_from_table(3, 3, vec![(0, 1), (0, 2), (1, 2)]).unwrap();
        let assignment = ClusteringEngine::direct(&graph).query(0.5).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assignment.tsv");
        write_assignment(&path, &assignment).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "0\t1\n1\t2\n2\t3\n");
    }

    #[test]
    fn distribution_table_is_tab_separated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distribution.tsv");
        write_distribution(&path, &[(0.5, 2), (0.75, 4)]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "0.5\t2\n0.75\t4\n");
    }

    #[test]
    fn summary_contains_graph_stats_and_runs() {
        let graph =
            SignedGraph::load_from_table(3, 3, vec![(0, 1), (0, 2), (1, 2)]).unwrap();
        let runs = vec![RunRecord {
            eps: 0.7,
            cluster_count: 1,
            direct_millis: 3,
            indexed_millis: 1,
        }];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary(&path, &graph, &runs).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["graph_stats"]["vertex_count"], 3);
        assert_eq!(parsed["graph_stats"]["edge_count"], 3);
        assert_eq!(parsed["runs"][0]["cluster_count"], 1);
    }
}
