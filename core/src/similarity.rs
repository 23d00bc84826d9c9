use serde::{Deserialize, Serialize};

use crate::error::CategoryError;
use crate::graph::NodeId;
use crate::store::CategoryStore;

/// An unordered similarity pair. `{a, b}` and `{b, a}` are the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimilarityEdge {
    pub first: NodeId,
    pub second: NodeId,
}

impl SimilarityEdge {
    pub fn new(first: NodeId, second: NodeId) -> Self {
        Self { first, second }
    }

    /// True if this edge joins `a` and `b`, in either order.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.first == id || self.second == id
    }

    pub fn as_pair(&self) -> (NodeId, NodeId) {
        (self.first, self.second)
    }
}

/// Mediates every read and write of similarity edges against a store.
///
/// Keeps the relation symmetric and free of duplicates. Each successful
/// mutation goes through the store, which bumps its generation.
pub struct SimilarityManager<'a, S: CategoryStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: CategoryStore + ?Sized> SimilarityManager<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Record that `a` and `b` are similar.
    ///
    /// Rejects self-pairs and unknown categories. An existing pair in either
    /// order yields `DuplicateEdge` and leaves the store untouched.
    pub fn add(&mut self, a: NodeId, b: NodeId) -> Result<SimilarityEdge, CategoryError> {
        if a == b {
            return Err(CategoryError::SelfSimilarity(a));
        }
        self.store.require_category(a)?;
        self.store.require_category(b)?;

        if self.find(a, b)?.is_some() {
            tracing::debug!(a, b, "similarity already recorded");
            return Err(CategoryError::DuplicateEdge(a, b));
        }

        let edge = SimilarityEdge::new(a, b);
        self.store.insert_similarity_edge(edge)?;
        tracing::info!(first = a, second = b, "similarity added");
        Ok(edge)
    }

    /// The stored edge joining `a` and `b`, in whichever order it was added.
    pub fn find(&self, a: NodeId, b: NodeId) -> Result<Option<SimilarityEdge>, CategoryError> {
        Ok(self
            .store
            .list_similarity_edges()?
            .into_iter()
            .find(|e| e.connects(a, b)))
    }

    /// Every edge with `id` as either endpoint, in storage order.
    pub fn list_for_category(&self, id: NodeId) -> Result<Vec<SimilarityEdge>, CategoryError> {
        self.store.require_category(id)?;
        Ok(self
            .store
            .list_similarity_edges()?
            .into_iter()
            .filter(|e| e.touches(id))
            .collect())
    }

    /// Delete the edge joining `a` and `b`, checked in both orders.
    pub fn remove(&mut self, a: NodeId, b: NodeId) -> Result<SimilarityEdge, CategoryError> {
        let edge = self
            .find(a, b)?
            .ok_or(CategoryError::EdgeNotFound(a, b))?;
        self.store.delete_similarity_edge(edge)?;
        tracing::info!(first = edge.first, second = edge.second, "similarity removed");
        Ok(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewCategory};

    fn store_with(n: usize) -> MemoryStore {
        let mut store = MemoryStore::new();
        for i in 0..n {
            store
                .create_category(NewCategory::named(&format!("category {}", i + 1)))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_edge_connects_either_order() {
        let e = SimilarityEdge::new(1, 2);
        assert!(e.connects(1, 2));
        assert!(e.connects(2, 1));
        assert!(!e.connects(1, 3));
        assert!(e.touches(2));
        assert!(!e.touches(5));
    }

    #[test]
    fn test_add_then_reverse_is_duplicate() {
        let mut store = store_with(2);
        let mut manager = SimilarityManager::new(&mut store);
        manager.add(1, 2).unwrap();
        let err = manager.add(2, 1).unwrap_err();
        assert!(matches!(err, CategoryError::DuplicateEdge(2, 1)));
        assert!(err.is_already_done());

        let edges = manager.list_for_category(1).unwrap();
        assert_eq!(edges, vec![SimilarityEdge::new(1, 2)]);
        assert_eq!(store.list_similarity_edges().unwrap().len(), 1);
    }

    #[test]
    fn test_add_same_order_twice_is_duplicate() {
        let mut store = store_with(2);
        let mut manager = SimilarityManager::new(&mut store);
        manager.add(1, 2).unwrap();
        assert!(matches!(manager.add(1, 2), Err(CategoryError::DuplicateEdge(1, 2))));
    }

    #[test]
    fn test_self_similarity_rejected() {
        let mut store = store_with(1);
        let mut manager = SimilarityManager::new(&mut store);
        assert!(matches!(manager.add(1, 1), Err(CategoryError::SelfSimilarity(1))));
        assert!(store.list_similarity_edges().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut store = store_with(1);
        let mut manager = SimilarityManager::new(&mut store);
        assert!(matches!(manager.add(1, 9), Err(CategoryError::CategoryNotFound(9))));
        assert!(matches!(
            manager.list_for_category(9),
            Err(CategoryError::CategoryNotFound(9))
        ));
    }

    #[test]
    fn test_find_either_order() {
        let mut store = store_with(3);
        let mut manager = SimilarityManager::new(&mut store);
        manager.add(3, 1).unwrap();
        assert_eq!(manager.find(1, 3).unwrap(), Some(SimilarityEdge::new(3, 1)));
        assert_eq!(manager.find(3, 1).unwrap(), Some(SimilarityEdge::new(3, 1)));
        assert_eq!(manager.find(1, 2).unwrap(), None);
    }

    #[test]
    fn test_remove_exactly_once() {
        let mut store = store_with(2);
        let mut manager = SimilarityManager::new(&mut store);
        manager.add(1, 2).unwrap();
        assert_eq!(manager.remove(2, 1).unwrap(), SimilarityEdge::new(1, 2));
        assert!(matches!(manager.remove(1, 2), Err(CategoryError::EdgeNotFound(1, 2))));
        assert!(manager.list_for_category(1).unwrap().is_empty());
    }

    #[test]
    fn test_list_for_category_both_endpoints() {
        let mut store = store_with(4);
        let mut manager = SimilarityManager::new(&mut store);
        manager.add(1, 2).unwrap();
        manager.add(3, 1).unwrap();
        manager.add(3, 4).unwrap();
        assert_eq!(
            manager.list_for_category(1).unwrap(),
            vec![SimilarityEdge::new(1, 2), SimilarityEdge::new(3, 1)]
        );
        assert_eq!(
            manager.list_for_category(4).unwrap(),
            vec![SimilarityEdge::new(3, 4)]
        );
    }

    #[test]
    fn test_mutations_bump_generation() {
        let mut store = store_with(2);
        let before = store.generation();
        SimilarityManager::new(&mut store).add(1, 2).unwrap();
        let after_add = store.generation();
        assert!(after_add > before);

        let _ = SimilarityManager::new(&mut store).add(2, 1);
        assert_eq!(store.generation(), after_add);

        SimilarityManager::new(&mut store).remove(1, 2).unwrap();
        assert!(store.generation() > after_add);
    }
}
