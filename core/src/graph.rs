use std::collections::HashMap;

/// Vertex identifier. Categories use the same id space.
pub type NodeId = u64;

/// In-memory undirected graph: one sorted neighbor list per vertex.
///
/// Edges are stored in both directions, `adjacency[a]` contains b and
/// `adjacency[b]` contains a. Neighbor lists are kept sorted by id so every
/// traversal visits neighbors in ascending order.
pub struct Graph {
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
            edge_count: 0,
        }
    }

    /// Pre-allocate for a known vertex count.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            adjacency: HashMap::with_capacity(node_count),
            edge_count: 0,
        }
    }

    /// Build a graph from a vertex set and a flat list of similarity pairs.
    ///
    /// Self-loops are dropped. Pairs naming a vertex outside `vertices` are
    /// skipped with a warning; they can only come from a store that lost a
    /// cascade delete.
    pub fn load<V, E>(vertices: V, edges: E) -> Self
    where
        V: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let vertices = vertices.into_iter();
        let mut graph = Self::with_capacity(vertices.size_hint().0);
        for id in vertices {
            graph.add_node(id);
        }

        let mut skipped = 0usize;
        for (a, b) in edges {
            if !graph.contains(a) || !graph.contains(b) {
                skipped += 1;
                continue;
            }
            graph.add_edge(a, b);
        }
        if skipped > 0 {
            tracing::warn!(skipped, "similarity pairs reference unknown categories");
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph loaded"
        );
        graph
    }

    /// Register a vertex. No-op if it already exists.
    pub fn add_node(&mut self, id: NodeId) {
        self.adjacency.entry(id).or_default();
    }

    /// Add an undirected edge, registering both endpoints.
    ///
    /// Returns false for self-loops and for pairs that are already connected.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            self.add_node(a);
            return false;
        }
        if !insert_sorted(self.adjacency.entry(a).or_default(), b) {
            return false;
        }
        insert_sorted(self.adjacency.entry(b).or_default(), a);
        self.edge_count += 1;
        true
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Neighbors of a vertex in ascending id order. Empty for unknown ids.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All vertex ids in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.adjacency.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_sorted(list: &mut Vec<NodeId>, id: NodeId) -> bool {
    match list.binary_search(&id) {
        Ok(_) => false,
        Err(pos) => {
            list.insert(pos, id);
            true
        }
    }
}
