use thiserror::Error;

use crate::graph::NodeId;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    CategoryNotFound(NodeId),
    #[error("Similarity not found: {0} <-> {1}")]
    EdgeNotFound(NodeId, NodeId),
    #[error("Similarity already exists: {0} <-> {1}")]
    DuplicateEdge(NodeId, NodeId),
    #[error("Category {0} cannot be similar to itself")]
    SelfSimilarity(NodeId),
    #[error("Invalid query type: '{0}' (expected subcategories, siblings, leaves or descendants)")]
    InvalidQueryType(String),
    #[error("Vertex {0} is not in the graph")]
    InvalidVertex(NodeId),
    #[error("Graph has no vertices to analyze")]
    EmptyGraph,
    #[error("Parent cycle detected at category {0}")]
    CycleDetected(NodeId),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CategoryError {
    pub fn code(&self) -> &str {
        match self {
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::EdgeNotFound(..) => "SIMILARITY_NOT_FOUND",
            Self::DuplicateEdge(..) => "SIMILARITY_DUPLICATE",
            Self::SelfSimilarity(_) => "SIMILARITY_SELF_LOOP",
            Self::InvalidQueryType(_) => "TREE_INVALID_QUERY_TYPE",
            Self::InvalidVertex(_) => "GRAPH_INVALID_VERTEX",
            Self::EmptyGraph => "GRAPH_EMPTY",
            Self::CycleDetected(_) => "TREE_CYCLE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// True when the failure means the requested state already holds.
    ///
    /// A duplicate similarity is reported to the caller but the relation it
    /// asked for exists, so boundary layers may treat it as success.
    pub fn is_already_done(&self) -> bool {
        matches!(self, Self::DuplicateEdge(..))
    }

    pub fn to_json_error(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
        })
    }
}
