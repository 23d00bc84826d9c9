//! Data-access seam between the engine and whatever persists categories.
//!
//! The engine only ever talks to [`CategoryStore`]. [`MemoryStore`] is the
//! in-process implementation used by the command line and the tests; it also
//! carries the category CRUD that other backends would expose through their
//! own APIs.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CategoryError;
use crate::graph::NodeId;
use crate::similarity::SimilarityEdge;
use crate::tree::CategoryTree;

pub type CategoryId = NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Opaque reference to an uploaded image (path or URI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub parent: Option<CategoryId>,
}

/// Fields for a category that does not have an id yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<CategoryId>,
}

impl NewCategory {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: CategoryId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Partial update. `None` leaves a field unchanged; `parent: Some(None)`
/// moves the category to the root level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<Option<CategoryId>>,
}

/// Read and similarity-write access to category data.
///
/// Every successful mutation must advance [`generation`](Self::generation)
/// so snapshots taken earlier can tell they are stale. Implementations
/// backed by shared storage must serialize similarity writes themselves;
/// `&mut self` only guarantees that within one process.
pub trait CategoryStore {
    fn list_categories(&self) -> Result<Vec<Category>, CategoryError>;

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, CategoryError>;

    fn list_similarity_edges(&self) -> Result<Vec<SimilarityEdge>, CategoryError>;

    fn insert_similarity_edge(&mut self, edge: SimilarityEdge) -> Result<(), CategoryError>;

    fn delete_similarity_edge(&mut self, edge: SimilarityEdge) -> Result<(), CategoryError>;

    /// Monotonic mutation counter.
    fn generation(&self) -> u64;

    /// Like `get_category`, but a missing id is `CategoryNotFound`.
    fn require_category(&self, id: CategoryId) -> Result<Category, CategoryError> {
        self.get_category(id)?
            .ok_or(CategoryError::CategoryNotFound(id))
    }
}

/// In-memory store keyed by category id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    categories: BTreeMap<CategoryId, Category>,
    similarities: Vec<SimilarityEdge>,
    last_id: CategoryId,
    generation: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted records, validating them on the way in.
    ///
    /// Rejects repeated ids, unknown parents, parent cycles, self-pairs,
    /// duplicate pairs in either order and pairs naming unknown categories.
    pub fn from_records(
        categories: Vec<Category>,
        similarities: Vec<SimilarityEdge>,
        generation: u64,
    ) -> Result<Self, CategoryError> {
        let mut map = BTreeMap::new();
        for category in categories {
            let id = category.id;
            if map.insert(id, category).is_some() {
                return Err(CategoryError::Storage(format!("duplicate category id {}", id)));
            }
        }

        for category in map.values() {
            if let Some(parent) = category.parent {
                if !map.contains_key(&parent) {
                    return Err(CategoryError::CategoryNotFound(parent));
                }
            }
        }
        CategoryTree::from_pairs(map.values().map(|c| (c.id, c.parent))).validate_acyclic()?;

        let mut seen: HashSet<(CategoryId, CategoryId)> = HashSet::new();
        for edge in &similarities {
            if edge.first == edge.second {
                return Err(CategoryError::SelfSimilarity(edge.first));
            }
            for id in [edge.first, edge.second] {
                if !map.contains_key(&id) {
                    return Err(CategoryError::CategoryNotFound(id));
                }
            }
            let key = (edge.first.min(edge.second), edge.first.max(edge.second));
            if !seen.insert(key) {
                return Err(CategoryError::DuplicateEdge(edge.first, edge.second));
            }
        }

        let last_id = map.keys().next_back().copied().unwrap_or(0);
        Ok(Self {
            categories: map,
            similarities,
            last_id,
            generation,
        })
    }

    /// Categories in id order and similarity pairs in insertion order.
    pub fn records(&self) -> (Vec<Category>, Vec<SimilarityEdge>) {
        (
            self.categories.values().cloned().collect(),
            self.similarities.clone(),
        )
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn similarity_count(&self) -> usize {
        self.similarities.len()
    }

    pub fn create_category(&mut self, new: NewCategory) -> Result<Category, CategoryError> {
        if let Some(parent) = new.parent {
            self.require_category(parent)?;
        }

        self.last_id += 1;
        let category = Category {
            id: self.last_id,
            name: new.name,
            description: new.description,
            image: None,
            parent: new.parent,
        };
        self.categories.insert(category.id, category.clone());
        self.bump();
        tracing::info!(id = category.id, parent = ?category.parent, "category created");
        Ok(category)
    }

    /// Apply a partial update. A new parent must exist and must not sit
    /// inside the category's own subtree.
    pub fn update_category(
        &mut self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, CategoryError> {
        self.require_category(id)?;

        if let Some(Some(parent)) = update.parent {
            self.require_category(parent)?;
            let proposed = CategoryTree::from_pairs(self.categories.values().map(|c| {
                if c.id == id {
                    (c.id, Some(parent))
                } else {
                    (c.id, c.parent)
                }
            }));
            proposed.ancestors(id)?;
        }

        let category = self
            .categories
            .get_mut(&id)
            .ok_or(CategoryError::CategoryNotFound(id))?;
        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(description) = update.description {
            category.description = description;
        }
        if let Some(parent) = update.parent {
            category.parent = parent;
        }
        let updated = category.clone();
        self.bump();
        tracing::info!(id, parent = ?updated.parent, "category updated");
        Ok(updated)
    }

    /// Attach or clear the image reference of a category.
    pub fn set_image(
        &mut self,
        id: CategoryId,
        image: Option<String>,
    ) -> Result<Category, CategoryError> {
        let category = self
            .categories
            .get_mut(&id)
            .ok_or(CategoryError::CategoryNotFound(id))?;
        category.image = image;
        let updated = category.clone();
        self.bump();
        Ok(updated)
    }

    /// Delete a category together with its whole subtree and every
    /// similarity touching a deleted category. Returns the removed ids in
    /// breadth-first order.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<Vec<CategoryId>, CategoryError> {
        let tree = CategoryTree::from_pairs(self.categories.values().map(|c| (c.id, c.parent)));
        let removed = tree.descendants(id)?;
        let removed_set: HashSet<CategoryId> = removed.iter().copied().collect();

        for cid in &removed {
            self.categories.remove(cid);
        }
        let before = self.similarities.len();
        self.similarities
            .retain(|e| !removed_set.contains(&e.first) && !removed_set.contains(&e.second));
        self.bump();

        tracing::info!(
            id,
            categories = removed.len(),
            similarities = before - self.similarities.len(),
            "category deleted"
        );
        Ok(removed)
    }

    fn bump(&mut self) {
        self.generation += 1;
    }
}

impl CategoryStore for MemoryStore {
    fn list_categories(&self) -> Result<Vec<Category>, CategoryError> {
        Ok(self.categories.values().cloned().collect())
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, CategoryError> {
        Ok(self.categories.get(&id).cloned())
    }

    fn list_similarity_edges(&self) -> Result<Vec<SimilarityEdge>, CategoryError> {
        Ok(self.similarities.clone())
    }

    fn insert_similarity_edge(&mut self, edge: SimilarityEdge) -> Result<(), CategoryError> {
        if self.similarities.iter().any(|e| e.connects(edge.first, edge.second)) {
            return Err(CategoryError::DuplicateEdge(edge.first, edge.second));
        }
        self.similarities.push(edge);
        self.bump();
        Ok(())
    }

    fn delete_similarity_edge(&mut self, edge: SimilarityEdge) -> Result<(), CategoryError> {
        let pos = self
            .similarities
            .iter()
            .position(|e| e.connects(edge.first, edge.second))
            .ok_or(CategoryError::EdgeNotFound(edge.first, edge.second))?;
        self.similarities.remove(pos);
        self.bump();
        Ok(())
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
