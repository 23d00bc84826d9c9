//! category-graph-core: category hierarchy and similarity graph engine.
//!
//! Navigates a parent-pointer forest of categories (subcategories, siblings,
//! leaves, descendants) and analyzes the undirected similarity relation
//! between them: BFS distances, the longest shortest-path chain ("rabbit
//! hole") and connected components ("islands").
//!
//! Storage is reached only through the [`CategoryStore`] trait. Each call
//! loads its own [`Snapshot`], so nothing is shared between invocations.

mod analysis;
mod error;
mod graph;
mod similarity;
mod snapshot;
mod store;
mod traversal;
mod tree;

pub use analysis::{analyze, analyze_graph, RabbitHoleReport};
pub use error::CategoryError;
pub use graph::{Graph, NodeId};
pub use similarity::{SimilarityEdge, SimilarityManager};
pub use snapshot::{rabbit_hole, tree_query, Snapshot};
pub use store::{Category, CategoryId, CategoryStore, CategoryUpdate, MemoryStore, NewCategory};
pub use traversal::{bfs, BfsResult};
pub use tree::{CategoryTree, TreeQuery};
