//! Rabbit-hole analysis over the similarity graph.
//!
//! Runs one BFS per vertex, keeps the longest eccentricity path seen and
//! collects every distinct reachable set. Cost is O(V * (V + E)), fine for
//! hand-curated category sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CategoryError;
use crate::graph::{Graph, NodeId};
use crate::traversal::bfs;

/// Result of a rabbit-hole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RabbitHoleReport {
    /// Longest shortest-path chain, starting vertex first.
    pub longest_path: Vec<NodeId>,
    /// Connected components, each sorted ascending.
    pub islands: BTreeSet<Vec<NodeId>>,
}

impl RabbitHoleReport {
    /// Number of edges along the longest path.
    pub fn hops(&self) -> usize {
        self.longest_path.len().saturating_sub(1)
    }
}

/// Analyze a vertex set and similarity pairs.
///
/// Duplicate vertex ids are ignored. Fails with `EmptyGraph` when `vertices`
/// is empty.
pub fn analyze(
    vertices: &[NodeId],
    edges: &[(NodeId, NodeId)],
) -> Result<RabbitHoleReport, CategoryError> {
    let graph = Graph::load(vertices.iter().copied(), edges.iter().copied());
    analyze_graph(&graph)
}

/// Analyze an already loaded graph.
///
/// Starts are processed in ascending id order and the longest path is only
/// replaced by a strictly longer one, so ties keep the smallest start.
pub fn analyze_graph(graph: &Graph) -> Result<RabbitHoleReport, CategoryError> {
    if graph.is_empty() {
        return Err(CategoryError::EmptyGraph);
    }

    let mut longest_path: Vec<NodeId> = Vec::new();
    let mut islands: BTreeSet<Vec<NodeId>> = BTreeSet::new();

    for start in graph.node_ids() {
        let result = bfs(graph, start)?;
        let (target, distance) = result.farthest();
        let path = result
            .path_to(target)
            .ok_or(CategoryError::InvalidVertex(target))?;
        debug_assert_eq!(path.len(), distance as usize + 1);

        if path.len() > longest_path.len() {
            longest_path = path;
        }
        islands.insert(result.reachable());
    }

    tracing::info!(
        vertices = graph.node_count(),
        edges = graph.edge_count(),
        longest = longest_path.len(),
        islands = islands.len(),
        "rabbit-hole analysis complete"
    );

    Ok(RabbitHoleReport {
        longest_path,
        islands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn islands(sets: &[&[NodeId]]) -> BTreeSet<Vec<NodeId>> {
        sets.iter().map(|s| s.to_vec()).collect()
    }

    #[test]
    fn test_triangle_with_isolated_vertices() {
        let report = analyze(&[1, 2, 3, 4, 5], &[(1, 2), (2, 4), (4, 1)]).unwrap();
        assert_eq!(report.islands, islands(&[&[1, 2, 4], &[3], &[5]]));
        assert_eq!(report.longest_path.len(), 2);
        assert_eq!(report.hops(), 1);
    }

    #[test]
    fn test_path_of_three_is_longest() {
        let report = analyze(&[1, 2, 3, 4, 5], &[(1, 2), (2, 4)]).unwrap();
        assert_eq!(report.islands, islands(&[&[1, 2, 4], &[3], &[5]]));
        assert_eq!(report.longest_path, vec![1, 2, 4]);
        let mut sorted = report.longest_path.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 4]);
    }

    #[test]
    fn test_chain_longest_path_from_smallest_end() {
        let edges: Vec<(NodeId, NodeId)> = (1..6).map(|i| (i, i + 1)).collect();
        let report = analyze(&[1, 2, 3, 4, 5, 6], &edges).unwrap();
        assert_eq!(report.longest_path, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(report.hops(), 5);
        assert_eq!(report.islands.len(), 1);
    }

    #[test]
    fn test_tie_keeps_smallest_start() {
        // Two separate chains of equal length.
        let report = analyze(
            &[10, 11, 12, 1, 2, 3],
            &[(10, 11), (11, 12), (1, 2), (2, 3)],
        )
        .unwrap();
        assert_eq!(report.longest_path, vec![1, 2, 3]);
        assert_eq!(report.islands, islands(&[&[1, 2, 3], &[10, 11, 12]]));
    }

    #[test]
    fn test_isolated_vertices_only() {
        let report = analyze(&[7, 8], &[]).unwrap();
        assert_eq!(report.longest_path, vec![7]);
        assert_eq!(report.hops(), 0);
        assert_eq!(report.islands, islands(&[&[7], &[8]]));
    }

    #[test]
    fn test_empty_graph_fails() {
        assert!(matches!(analyze(&[], &[]), Err(CategoryError::EmptyGraph)));
    }

    #[test]
    fn test_duplicate_vertices_ignored() {
        let report = analyze(&[1, 1, 2], &[(1, 2), (2, 1)]).unwrap();
        assert_eq!(report.islands, islands(&[&[1, 2]]));
        assert_eq!(report.longest_path, vec![1, 2]);
    }

    #[test]
    fn test_cycle_longest_path_is_half_ring() {
        let edges: Vec<(NodeId, NodeId)> = (0..6).map(|i| (i, (i + 1) % 6)).collect();
        let report = analyze(&[0, 1, 2, 3, 4, 5], &edges).unwrap();
        assert_eq!(report.hops(), 3);
        assert_eq!(report.longest_path.first(), Some(&0));
        assert_eq!(report.longest_path.last(), Some(&3));
    }

    #[test]
    fn test_report_serializes_islands_as_arrays() {
        let report = analyze(&[1, 2, 3], &[(1, 2)]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["longest_path"], serde_json::json!([1, 2]));
        assert_eq!(json["islands"], serde_json::json!([[1, 2], [3]]));
    }
}
