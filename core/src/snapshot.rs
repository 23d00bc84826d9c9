//! Generation-stamped snapshots of store contents.
//!
//! Every query and analysis works on a snapshot loaded once per call. The
//! store's generation counter advances on each mutation, so a snapshot can
//! report whether it still matches the store it came from.

use std::time::Instant;

use crate::analysis::{analyze_graph, RabbitHoleReport};
use crate::error::CategoryError;
use crate::graph::{Graph, NodeId};
use crate::similarity::SimilarityEdge;
use crate::store::{Category, CategoryStore};
use crate::tree::{CategoryTree, TreeQuery};

pub struct Snapshot {
    pub categories: Vec<Category>,
    pub edges: Vec<SimilarityEdge>,
    /// Store generation at load time.
    pub generation: u64,
    pub load_time_ms: f64,
}

impl Snapshot {
    pub fn load<S: CategoryStore + ?Sized>(store: &S) -> Result<Self, CategoryError> {
        let start = Instant::now();
        let generation = store.generation();
        let categories = store.list_categories()?;
        let edges = store.list_similarity_edges()?;
        let load_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        tracing::debug!(
            categories = categories.len(),
            edges = edges.len(),
            generation,
            load_time_ms,
            "snapshot loaded"
        );

        Ok(Self {
            categories,
            edges,
            generation,
            load_time_ms,
        })
    }

    /// True once the store has been mutated after this snapshot was taken.
    pub fn is_stale<S: CategoryStore + ?Sized>(&self, store: &S) -> bool {
        self.generation < store.generation()
    }

    pub fn category_ids(&self) -> Vec<NodeId> {
        self.categories.iter().map(|c| c.id).collect()
    }

    pub fn tree(&self) -> CategoryTree {
        CategoryTree::from_pairs(self.categories.iter().map(|c| (c.id, c.parent)))
    }

    pub fn graph(&self) -> Graph {
        Graph::load(self.category_ids(), self.edges.iter().map(|e| e.as_pair()))
    }
}

/// Answer a tree query named by a boundary string such as `"leaves"`.
///
/// Unknown kinds fail with `InvalidQueryType` before the store is read.
pub fn tree_query<S: CategoryStore + ?Sized>(
    store: &S,
    id: NodeId,
    kind: &str,
) -> Result<Vec<NodeId>, CategoryError> {
    let kind: TreeQuery = kind.parse()?;
    let snapshot = Snapshot::load(store)?;
    snapshot.tree().query(id, kind)
}

/// Load a fresh snapshot and run the rabbit-hole analysis over it.
pub fn rabbit_hole<S: CategoryStore + ?Sized>(store: &S) -> Result<RabbitHoleReport, CategoryError> {
    let snapshot = Snapshot::load(store)?;
    analyze_graph(&snapshot.graph())
}
