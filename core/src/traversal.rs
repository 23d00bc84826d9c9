use std::collections::{BTreeMap, VecDeque};

use crate::error::CategoryError;
use crate::graph::{Graph, NodeId};

/// Output of a single BFS run.
///
/// Both maps are keyed by vertex id, so iteration is in ascending id order.
#[derive(Debug, Clone)]
pub struct BfsResult {
    pub start: NodeId,
    /// Hop count from `start` for every reachable vertex, `start` included at 0.
    pub distances: BTreeMap<NodeId, u32>,
    /// Vertex each reachable vertex was first discovered from. `start` has no entry.
    pub predecessors: BTreeMap<NodeId, NodeId>,
}

impl BfsResult {
    /// The eccentricity target: the reachable vertex farthest from `start`.
    ///
    /// Ties go to the smallest id. Returns `(start, 0)` when nothing else is
    /// reachable.
    pub fn farthest(&self) -> (NodeId, u32) {
        let mut best = (self.start, 0);
        for (&id, &distance) in &self.distances {
            if distance > best.1 {
                best = (id, distance);
            }
        }
        best
    }

    /// Vertices reachable from `start`, ascending.
    pub fn reachable(&self) -> Vec<NodeId> {
        self.distances.keys().copied().collect()
    }

    /// Shortest path from `start` to `target`, both endpoints included.
    ///
    /// Walks predecessor pointers back from `target`, then reverses, so the
    /// result begins with `start`. None if `target` was not reached.
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        let distance = *self.distances.get(&target)?;
        let mut path = Vec::with_capacity(distance as usize + 1);
        let mut current = target;
        path.push(current);

        while current != self.start {
            current = *self.predecessors.get(&current)?;
            path.push(current);
        }

        path.reverse();
        Some(path)
    }
}

/// Breadth-first search over the whole component containing `start`.
///
/// Vertices are marked visited when enqueued, so each one gets exactly one
/// predecessor at its minimum distance. Neighbors come out of the graph in
/// ascending order, which fixes the tie-break between equal-length paths.
pub fn bfs(graph: &Graph, start: NodeId) -> Result<BfsResult, CategoryError> {
    if !graph.contains(start) {
        return Err(CategoryError::InvalidVertex(start));
    }

    let mut distances: BTreeMap<NodeId, u32> = BTreeMap::new();
    let mut predecessors: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    let mut queue: VecDeque<(NodeId, u32)> = VecDeque::new();

    distances.insert(start, 0);
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        for &next in graph.neighbors(current) {
            if !distances.contains_key(&next) {
                distances.insert(next, depth + 1);
                predecessors.insert(next, current);
                queue.push_back((next, depth + 1));
            }
        }
    }

    Ok(BfsResult {
        start,
        distances,
        predecessors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chain(n: u64) -> Graph {
        Graph::load(0..n, (0..n - 1).map(|i| (i, i + 1)))
    }

    fn make_star(center: u64, leaves: u64) -> Graph {
        Graph::load(
            std::iter::once(center).chain(1..=leaves),
            (1..=leaves).map(|i| (center, i)),
        )
    }

    fn make_cycle(n: u64) -> Graph {
        Graph::load(0..n, (0..n).map(|i| (i, (i + 1) % n)))
    }

    fn assert_distance_invariant(result: &BfsResult) {
        assert_eq!(result.distances[&result.start], 0);
        assert!(!result.predecessors.contains_key(&result.start));
        for (id, &distance) in &result.distances {
            if *id == result.start {
                continue;
            }
            let parent = result.predecessors[id];
            assert_eq!(result.distances[&parent] + 1, distance);
        }
    }

    #[test]
    fn test_bfs_chain() {
        let g = make_chain(6);
        let result = bfs(&g, 0).unwrap();
        assert_eq!(result.distances.len(), 6);
        assert_eq!(result.distances[&5], 5);
        assert_distance_invariant(&result);
    }

    #[test]
    fn test_bfs_star() {
        let g = make_star(0, 100);
        let result = bfs(&g, 0).unwrap();
        assert_eq!(result.distances.len(), 101);
        assert!(result.distances.iter().all(|(&id, &d)| id == 0 || d == 1));
        assert_distance_invariant(&result);
    }

    #[test]
    fn test_bfs_cycle_no_infinite_loop() {
        let g = make_cycle(5);
        let result = bfs(&g, 0).unwrap();
        assert_eq!(result.distances.len(), 5);
        assert_eq!(result.distances[&2], 2);
        assert_eq!(result.distances[&3], 2);
        assert_distance_invariant(&result);
    }

    #[test]
    fn test_bfs_start_not_in_graph() {
        let g = make_chain(3);
        assert!(matches!(bfs(&g, 999), Err(CategoryError::InvalidVertex(999))));
    }

    #[test]
    fn test_bfs_empty_graph() {
        let g = Graph::new();
        assert!(matches!(bfs(&g, 0), Err(CategoryError::InvalidVertex(0))));
    }

    #[test]
    fn test_bfs_unreachable_absent() {
        let g = Graph::load(1..=4, vec![(1, 2), (3, 4)]);
        let result = bfs(&g, 1).unwrap();
        assert_eq!(result.reachable(), vec![1, 2]);
        assert!(!result.distances.contains_key(&3));
        assert!(result.path_to(3).is_none());
    }

    #[test]
    fn test_bfs_isolated_start() {
        let g = Graph::load(vec![9], Vec::new());
        let result = bfs(&g, 9).unwrap();
        assert_eq!(result.reachable(), vec![9]);
        assert!(result.predecessors.is_empty());
        assert_eq!(result.farthest(), (9, 0));
        assert_eq!(result.path_to(9), Some(vec![9]));
    }

    #[test]
    fn test_bfs_lowest_id_parent_wins() {
        // Diamond 1-2-4, 1-3-4: node 4 is reached first through 2.
        let g = Graph::load(1..=4, vec![(1, 3), (3, 4), (1, 2), (2, 4)]);
        let result = bfs(&g, 1).unwrap();
        assert_eq!(result.predecessors[&4], 2);
        assert_eq!(result.path_to(4), Some(vec![1, 2, 4]));
    }

    #[test]
    fn test_farthest_tie_breaks_on_smallest_id() {
        let g = make_star(0, 4);
        let result = bfs(&g, 0).unwrap();
        assert_eq!(result.farthest(), (1, 1));
    }

    #[test]
    fn test_path_to_chain() {
        let g = make_chain(5);
        let result = bfs(&g, 4).unwrap();
        assert_eq!(result.farthest(), (0, 4));
        assert_eq!(result.path_to(0), Some(vec![4, 3, 2, 1, 0]));
    }

    #[test]
    fn test_distance_invariant_random_graph() {
        let mut state = 42u64;
        let mut next = move |max: u64| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 33) % max
        };
        let edges: Vec<(u64, u64)> = (0..200).map(|_| (next(60), next(60))).collect();
        let g = Graph::load(0..60, edges);
        for start in g.node_ids() {
            assert_distance_invariant(&bfs(&g, start).unwrap());
        }
    }
}
