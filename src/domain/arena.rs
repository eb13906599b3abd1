use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::error::{DomainError, TreeResult};

/// Data payload for tree nodes: one vampire in the lineage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vampire {
    /// Identifying label, used by name lookup
    pub name: String,
    /// Year this vampire was converted
    pub year_converted: i32,
}

impl Vampire {
    pub fn new(name: impl Into<String>, year_converted: i32) -> Self {
        Self {
            name: name.into(),
            year_converted,
        }
    }
}

impl fmt::Display for Vampire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.year_converted)
    }
}

/// Tree node in the arena-based lineage structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Vampire data for this node
    pub data: Vampire,
    /// Index of the converting ancestor in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of offspring nodes, in conversion order
    pub children: Vec<Index>,
}

/// Arena-based genealogical tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Parent links are plain indices, never owning pointers, so the upward
/// back-reference cannot create a retain cycle.
///
/// The tree shape is enforced at mutation time: exactly one root, one parent
/// per node, no cycles. A node enters the tree attached to its parent in a
/// single `insert_node` call, so re-parenting is not expressible and the
/// parent/children links can never disagree.
#[derive(Debug)]
pub struct GenealogyTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for an empty tree
    root: Option<Index>,
}

impl Default for GenealogyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GenealogyTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a vampire into the tree.
    ///
    /// With `parent: None` the vampire becomes the root; with
    /// `parent: Some(idx)` it is appended to that node's offspring and its
    /// parent link set, both in this one call.
    ///
    /// Errors with `RootAlreadyExists` on a second root insert and
    /// `NodeNotFound` on a stale or foreign parent index.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: Vampire, parent: Option<Index>) -> TreeResult<Index> {
        if let Some(parent_idx) = parent {
            if !self.arena.contains(parent_idx) {
                return Err(DomainError::NodeNotFound(parent_idx));
            }
        } else if let Some(root_idx) = self.root {
            return Err(DomainError::RootAlreadyExists(root_idx));
        }

        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent_idx) {
                parent_node.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        Ok(node_idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order iterator over the whole tree, root first.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::from_root(self)
    }

    /// Pre-order iterator over the subtree at `start`, `start` included.
    /// Empty for a stale index.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_subtree(&self, start: Index) -> TreeIterator {
        TreeIterator::from_node(self, start)
    }

    /// Walks the parent chain from `start` (inclusive) up to the root.
    #[instrument(level = "trace", skip(self))]
    pub fn ancestors(&self, start: Index) -> AncestorIterator {
        AncestorIterator::new(self, start)
    }

    /// Number of immediate offspring. O(1); 0 for a stale index.
    #[instrument(level = "trace", skip(self))]
    pub fn offspring_count(&self, idx: Index) -> usize {
        self.get_node(idx).map_or(0, |node| node.children.len())
    }

    /// Number of parent hops from `idx` up to the root; the root is 0.
    /// A stale index has an empty ancestor walk and also reports 0.
    #[instrument(level = "debug", skip(self))]
    pub fn generations_from_original(&self, idx: Index) -> usize {
        self.ancestors(idx).count().saturating_sub(1)
    }

    /// Strictly closer to the root than `other`. Equal depth is never
    /// senior, so no node is senior to itself.
    ///
    /// Meaningful only for indices of this tree: a stale index reports
    /// generation 0 and therefore compares like the root.
    #[instrument(level = "debug", skip(self))]
    pub fn is_more_senior(&self, idx: Index, other: Index) -> bool {
        self.generations_from_original(idx) < self.generations_from_original(other)
    }

    /// Nearest node that is an ancestor-or-self of both `a` and `b`.
    ///
    /// Builds the inclusive ancestor path of each node, then scans the
    /// path of `a` outward from `a`, returning its first entry that also
    /// appears on the path of `b`. Nodes are matched by arena index, so
    /// duplicate names elsewhere in the tree cannot skew the result.
    ///
    /// Returns None only when the paths share no entry, which a stale
    /// index produces; within one rooted tree the root is always shared.
    #[instrument(level = "debug", skip(self))]
    pub fn closest_common_ancestor(&self, a: Index, b: Index) -> Option<Index> {
        let path_a: Vec<Index> = self.ancestors(a).map(|(idx, _)| idx).collect();
        let path_b: Vec<Index> = self.ancestors(b).map(|(idx, _)| idx).collect();

        for idx_a in &path_a {
            for idx_b in &path_b {
                if idx_a == idx_b {
                    return Some(*idx_a);
                }
            }
        }
        None
    }

    /// First node named `name` in pre-order (self, then offspring
    /// left-to-right) within the subtree at `start`.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_name(&self, start: Index, name: &str) -> Option<Index> {
        self.iter_subtree(start)
            .find(|(_, node)| node.data.name == name)
            .map(|(idx, _)| idx)
    }

    /// Count of all nodes strictly below `idx`.
    #[instrument(level = "debug", skip(self))]
    pub fn descendant_count(&self, idx: Index) -> usize {
        self.iter_subtree(idx).count().saturating_sub(1)
    }

    /// All nodes in the subtree at `start` (self included) satisfying the
    /// predicate, in pre-order. Each node is visited exactly once.
    #[instrument(level = "debug", skip(self, predicate))]
    pub fn collect_where<P>(&self, start: Index, predicate: P) -> Vec<Index>
    where
        P: Fn(&Vampire) -> bool,
    {
        self.iter_subtree(start)
            .filter(|(_, node)| predicate(&node.data))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Subtree members converted strictly after `year`, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn converted_after(&self, start: Index, year: i32) -> Vec<Index> {
        self.collect_where(start, |vampire| vampire.year_converted > year)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a GenealogyTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn from_root(tree: &'a GenealogyTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }

    fn from_node(tree: &'a GenealogyTree, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.get_node(start).is_some() {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct AncestorIterator<'a> {
    tree: &'a GenealogyTree,
    next: Option<Index>,
}

impl<'a> AncestorIterator<'a> {
    fn new(tree: &'a GenealogyTree, start: Index) -> Self {
        let next = tree.get_node(start).map(|_| start);
        Self { tree, next }
    }
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.next?;
        let node = self.tree.get_node(current_idx)?;
        self.next = node.parent;
        Some((current_idx, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ansel
    // ├── Sarah
    // │   └── Carmilla
    // └── Andrew
    fn coven() -> (GenealogyTree, Index, Index, Index, Index) {
        let mut tree = GenealogyTree::new();
        let ansel = tree.insert_node(Vampire::new("Ansel", 1420), None).unwrap();
        let sarah = tree
            .insert_node(Vampire::new("Sarah", 1920), Some(ansel))
            .unwrap();
        let andrew = tree
            .insert_node(Vampire::new("Andrew", 1950), Some(ansel))
            .unwrap();
        let carmilla = tree
            .insert_node(Vampire::new("Carmilla", 2000), Some(sarah))
            .unwrap();
        (tree, ansel, sarah, andrew, carmilla)
    }

    #[test]
    fn test_insert_node_links_parent_and_children() {
        let (tree, ansel, sarah, andrew, carmilla) = coven();

        assert_eq!(tree.root(), Some(ansel));
        assert_eq!(tree.len(), 4);

        let root = tree.get_node(ansel).unwrap();
        assert_eq!(root.parent, None);
        assert_eq!(root.children, vec![sarah, andrew]);

        assert_eq!(tree.get_node(carmilla).unwrap().parent, Some(sarah));
    }

    #[test]
    fn test_second_root_is_rejected() {
        let (mut tree, ansel, ..) = coven();

        let result = tree.insert_node(Vampire::new("Pretender", 1666), None);
        assert!(matches!(
            result,
            Err(DomainError::RootAlreadyExists(idx)) if idx == ansel
        ));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_foreign_parent_index_is_rejected() {
        let (_other, _, sarah, ..) = coven();

        let mut tree = GenealogyTree::new();
        tree.insert_node(Vampire::new("Solo", 1800), None).unwrap();

        let result = tree.insert_node(Vampire::new("Orphan", 1900), Some(sarah));
        assert!(matches!(result, Err(DomainError::NodeNotFound(_))));
    }

    #[test]
    fn test_foreign_index_reports_generation_zero() {
        let (_other, .., carmilla) = coven();

        let mut tree = GenealogyTree::new();
        let root = tree.insert_node(Vampire::new("Solo", 1800), None).unwrap();
        let child = tree
            .insert_node(Vampire::new("Minor", 1900), Some(root))
            .unwrap();

        // carmilla's slot is vacant in this arena, so its ancestor walk is empty
        assert_eq!(tree.ancestors(carmilla).count(), 0);
        assert_eq!(tree.generations_from_original(carmilla), 0);
        // generation 0 compares like the root
        assert!(!tree.is_more_senior(carmilla, root));
        assert!(tree.is_more_senior(carmilla, child));
    }

    #[test]
    fn test_preorder_iteration_is_left_to_right() {
        let (tree, ansel, sarah, andrew, carmilla) = coven();

        let order: Vec<Index> = tree.iter().map(|(idx, _)| idx).collect();
        assert_eq!(order, vec![ansel, sarah, carmilla, andrew]);
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let (tree, ansel, sarah, _, carmilla) = coven();

        let chain: Vec<Index> = tree.ancestors(carmilla).map(|(idx, _)| idx).collect();
        assert_eq!(chain, vec![carmilla, sarah, ansel]);
    }

    #[test]
    fn test_empty_tree_has_no_root_and_no_nodes() {
        let tree = GenealogyTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.iter().count(), 0);
    }
}
