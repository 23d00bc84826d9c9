use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use crate::error::CategoryError;
use crate::graph::NodeId;

/// Tree navigation queries available at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeQuery {
    Subcategories,
    Siblings,
    Leaves,
    Descendants,
}

impl TreeQuery {
    pub const ALL: [TreeQuery; 4] = [
        TreeQuery::Subcategories,
        TreeQuery::Siblings,
        TreeQuery::Leaves,
        TreeQuery::Descendants,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TreeQuery::Subcategories => "subcategories",
            TreeQuery::Siblings => "siblings",
            TreeQuery::Leaves => "leaves",
            TreeQuery::Descendants => "descendants",
        }
    }
}

impl fmt::Display for TreeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreeQuery {
    type Err = CategoryError;

    /// Case-insensitive. Anything else is `InvalidQueryType`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subcategories" => Ok(TreeQuery::Subcategories),
            "siblings" => Ok(TreeQuery::Siblings),
            "leaves" => Ok(TreeQuery::Leaves),
            "descendants" => Ok(TreeQuery::Descendants),
            _ => Err(CategoryError::InvalidQueryType(s.to_string())),
        }
    }
}

/// Parent-pointer forest with a derived child index.
///
/// Built once per query from the full `(id, parent)` set. Child lists are
/// ascending. A parent id that is not itself a category still groups its
/// children, it just never shows up as a node.
pub struct CategoryTree {
    parents: BTreeMap<NodeId, Option<NodeId>>,
    children: BTreeMap<Option<NodeId>, Vec<NodeId>>,
}

impl CategoryTree {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, Option<NodeId>)>,
    {
        let parents: BTreeMap<NodeId, Option<NodeId>> = pairs.into_iter().collect();
        let mut children: BTreeMap<Option<NodeId>, Vec<NodeId>> = BTreeMap::new();
        // parents iterates in id order, so each child list comes out sorted
        for (&id, &parent) in &parents {
            children.entry(parent).or_default().push(id);
        }
        Self { parents, children }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.parents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Parent of `id`; `Ok(None)` for a root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, CategoryError> {
        self.parents
            .get(&id)
            .copied()
            .ok_or(CategoryError::CategoryNotFound(id))
    }

    /// Root-level categories, ascending.
    pub fn roots(&self) -> &[NodeId] {
        self.child_slice(None)
    }

    /// Run a query by kind.
    pub fn query(&self, id: NodeId, kind: TreeQuery) -> Result<Vec<NodeId>, CategoryError> {
        match kind {
            TreeQuery::Subcategories => self.subcategories(id),
            TreeQuery::Siblings => self.siblings(id),
            TreeQuery::Leaves => self.leaves(id),
            TreeQuery::Descendants => self.descendants(id),
        }
    }

    /// Direct children of `id`, ascending.
    pub fn subcategories(&self, id: NodeId) -> Result<Vec<NodeId>, CategoryError> {
        self.ensure(id)?;
        Ok(self.child_slice(Some(id)).to_vec())
    }

    /// Every category sharing `id`'s parent, `id` included, ascending.
    pub fn siblings(&self, id: NodeId) -> Result<Vec<NodeId>, CategoryError> {
        let parent = self.parent(id)?;
        Ok(self.child_slice(parent).to_vec())
    }

    /// Childless nodes of the subtree rooted at `id`, ascending.
    ///
    /// A category without children is its own only leaf.
    pub fn leaves(&self, id: NodeId) -> Result<Vec<NodeId>, CategoryError> {
        let mut leaves: Vec<NodeId> = self
            .descendants(id)?
            .into_iter()
            .filter(|&node| self.child_slice(Some(node)).is_empty())
            .collect();
        leaves.sort_unstable();
        Ok(leaves)
    }

    /// The subtree rooted at `id`, `id` first, in breadth-first order.
    ///
    /// Fails with `CycleDetected` if a node is reached twice, which can only
    /// happen when the parent links loop back into the subtree.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, CategoryError> {
        self.ensure(id)?;

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut order: Vec<NodeId> = Vec::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        visited.insert(id);
        queue.push_back(id);

        while let Some(current) = queue.pop_front() {
            order.push(current);
            for &child in self.child_slice(Some(current)) {
                if !visited.insert(child) {
                    return Err(CategoryError::CycleDetected(child));
                }
                queue.push_back(child);
            }
        }

        tracing::debug!(root = id, count = order.len(), "descendants collected");
        Ok(order)
    }

    /// Parent chain above `id`, nearest parent first, ending at a root.
    ///
    /// Stops at a parent id that is not a known category. Fails with
    /// `CycleDetected` if the chain loops.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>, CategoryError> {
        let mut chain = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();
        seen.insert(id);

        let mut current = self.parent(id)?;
        while let Some(parent) = current {
            if !seen.insert(parent) {
                return Err(CategoryError::CycleDetected(parent));
            }
            chain.push(parent);
            current = self.parents.get(&parent).copied().flatten();
        }
        Ok(chain)
    }

    /// Check every parent chain terminates.
    pub fn validate_acyclic(&self) -> Result<(), CategoryError> {
        let mut cleared: HashSet<NodeId> = HashSet::with_capacity(self.parents.len());
        for &id in self.parents.keys() {
            if cleared.contains(&id) {
                continue;
            }
            let chain = self.ancestors(id)?;
            cleared.insert(id);
            cleared.extend(chain);
        }
        Ok(())
    }

    fn ensure(&self, id: NodeId) -> Result<(), CategoryError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(CategoryError::CategoryNotFound(id))
        }
    }

    fn child_slice(&self, parent: Option<NodeId>) -> &[NodeId] {
        self.children
            .get(&parent)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
