//! Node layer: bounded entry/child storage with node-local operations.
//!
//! A node holds between `t - 1` and `2t - 1` entries sorted by key (the root
//! may hold fewer) and, when internal, exactly one more child than entries:
//!
//! ```text
//!            ┌──────┬──────┬──────┐
//!            │ e[0] │ e[1] │ e[2] │
//!            └──────┴──────┴──────┘
//!           ╱      ╱        ╲      ╲
//!       c[0]    c[1]        c[2]    c[3]
//!   keys < e[0]  e[0]..e[1]  e[1]..e[2]  keys > e[2]
//! ```
//!
//! Structural operations that touch two children (split, merge, borrow) are
//! methods on the parent so that both children are reached through one
//! exclusive borrow.

mod entry;

pub use entry::Entry;

use std::borrow::Borrow;

use crate::types::{max_entries, min_entries};

/// A B-tree node owning its entries and child subtrees
#[derive(Debug)]
pub struct Node<K, V> {
    /// Entries sorted strictly by key
    entries: Vec<Entry<K, V>>,
    /// Child subtrees (empty for leaves, `entries.len() + 1` otherwise)
    children: Vec<Box<Node<K, V>>>,
    /// Fixed at construction; never derived from `children`
    leaf: bool,
    /// Minimum degree `t` of the owning tree
    min_degree: usize,
}

impl<K, V> Node<K, V> {
    /// Create a new empty leaf node
    pub fn new_leaf(min_degree: usize) -> Self {
        Self::with_kind(true, min_degree)
    }

    /// Create a new empty internal node
    pub fn new_internal(min_degree: usize) -> Self {
        Self::with_kind(false, min_degree)
    }

    fn with_kind(leaf: bool, min_degree: usize) -> Self {
        assert!(min_degree >= 2, "minimum degree must be at least 2");
        Self {
            entries: Vec::with_capacity(max_entries(min_degree)),
            children: if leaf {
                Vec::new()
            } else {
                Vec::with_capacity(2 * min_degree)
            },
            leaf,
            min_degree,
        }
    }

    /// Create an entry-less internal node whose only child is `child`.
    ///
    /// This is the transient shape of a new root right before its first
    /// `split_child(0)`.
    pub(crate) fn internal_over(child: Box<Node<K, V>>) -> Self {
        let mut node = Self::new_internal(child.min_degree);
        node.children.push(child);
        node
    }

    /// Number of entries in this node
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if this node holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if this is a leaf node
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Check if this node is at capacity (`2t - 1` entries)
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.max_entries()
    }

    /// Check if this node can give up an entry without underflowing
    pub fn has_spare(&self) -> bool {
        self.entries.len() > self.min_entries()
    }

    /// Minimum degree of the tree this node belongs to
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Entry capacity of this node
    pub fn max_entries(&self) -> usize {
        max_entries(self.min_degree)
    }

    /// Entry floor of this node when it is not the root
    pub fn min_entries(&self) -> usize {
        min_entries(self.min_degree)
    }

    /// Entries in key order
    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    /// Child subtrees in key order
    pub fn children(&self) -> &[Box<Node<K, V>>] {
        &self.children
    }

    /// Get the entry at the given index
    pub fn entry(&self, index: usize) -> &Entry<K, V> {
        &self.entries[index]
    }

    /// Get the child at the given index
    pub fn child(&self, index: usize) -> &Node<K, V> {
        &self.children[index]
    }

    pub(crate) fn child_mut(&mut self, index: usize) -> &mut Node<K, V> {
        &mut self.children[index]
    }

    pub(crate) fn value_mut(&mut self, index: usize) -> &mut V {
        self.entries[index].value_mut()
    }

    /// Binary search for a key.
    ///
    /// Returns `Ok(index)` when the key is stored in this node, otherwise
    /// `Err(branch)`: the insertion slot, which is also the index of the child
    /// whose key range contains `key`.
    pub fn search<Q>(&self, key: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .binary_search_by(|entry| entry.key().borrow().cmp(key))
    }

    /// Index of `key` in this node, if present
    pub fn find_key_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).ok()
    }

    /// Insert an entry into this node's own sorted entries.
    ///
    /// # Panics
    ///
    /// If the node is full or already holds the key.
    pub fn insert_entry(&mut self, entry: Entry<K, V>)
    where
        K: Ord,
    {
        match self.search(entry.key()) {
            Ok(_) => panic!("insert_entry: key already present in node"),
            Err(pos) => self.insert_entry_at(pos, entry),
        }
    }

    pub(crate) fn insert_entry_at(&mut self, pos: usize, entry: Entry<K, V>) {
        assert!(!self.is_full(), "insert_entry: node is full");
        self.entries.insert(pos, entry);
    }

    /// Swap the entry at `index` for `entry`, returning the old one
    pub(crate) fn replace_entry(&mut self, index: usize, entry: Entry<K, V>) -> Entry<K, V> {
        std::mem::replace(&mut self.entries[index], entry)
    }

    /// Remove the entry at `index` from a leaf
    pub(crate) fn remove_entry(&mut self, index: usize) -> Entry<K, V> {
        assert!(self.leaf, "remove_entry: entries of internal nodes separate children");
        self.entries.remove(index)
    }

    /// Remove the largest entry of a leaf
    pub(crate) fn pop_last_entry(&mut self) -> Option<Entry<K, V>> {
        assert!(self.leaf, "pop_last_entry: node is internal");
        self.entries.pop()
    }

    /// Remove the smallest entry of a leaf
    pub(crate) fn pop_first_entry(&mut self) -> Option<Entry<K, V>> {
        assert!(self.leaf, "pop_first_entry: node is internal");
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Detach the sole child of an internal node that has run out of entries
    pub(crate) fn take_only_child(&mut self) -> Option<Box<Node<K, V>>> {
        if self.leaf || !self.entries.is_empty() || self.children.len() != 1 {
            return None;
        }
        self.children.pop()
    }

    /// Split the full child at `child_index`.
    ///
    /// The child keeps its lower `t - 1` entries (and `t` children), a new
    /// sibling receives the upper `t - 1` entries (and `t` children), and the
    /// median entry moves up into this node at `child_index`, with the new
    /// sibling linked at `child_index + 1`.
    ///
    /// # Panics
    ///
    /// If this node is full or the child is not.
    pub fn split_child(&mut self, child_index: usize) {
        assert!(!self.is_full(), "split_child: parent is full");
        let t = self.min_degree;
        let child = &mut self.children[child_index];
        assert!(child.is_full(), "split_child: child is not full");

        let upper_entries = child.entries.split_off(t);
        let upper_children = if child.leaf {
            Vec::new()
        } else {
            child.children.split_off(t)
        };
        let median = match child.entries.pop() {
            Some(median) => median,
            None => unreachable!("full child has a median entry"),
        };

        let mut sibling = Node::with_kind(child.leaf, t);
        sibling.entries.extend(upper_entries);
        sibling.children.extend(upper_children);

        self.entries.insert(child_index, median);
        self.children.insert(child_index + 1, Box::new(sibling));
    }

    /// Merge the child at `child_index + 1` into the child at `child_index`.
    ///
    /// The separating entry `entries[child_index]` moves down between the two
    /// halves; the right child is dropped.
    ///
    /// # Panics
    ///
    /// If the merged node would exceed capacity.
    pub fn merge_children(&mut self, child_index: usize) {
        let right = *self.children.remove(child_index + 1);
        let separator = self.entries.remove(child_index);
        let left = &mut self.children[child_index];
        assert!(
            left.entries.len() + right.entries.len() < left.max_entries(),
            "merge_children: siblings too large to merge"
        );
        assert_eq!(left.leaf, right.leaf, "merge_children: siblings at different depths");

        left.entries.push(separator);
        left.entries.extend(right.entries);
        left.children.extend(right.children);
    }

    /// Rotate one entry from the left sibling through this node into the
    /// child at `child_index`.
    ///
    /// # Panics
    ///
    /// If there is no left sibling or it has no spare entry.
    pub fn borrow_from_prev(&mut self, child_index: usize) {
        assert!(child_index > 0, "borrow_from_prev: child has no left sibling");
        let (before, after) = self.children.split_at_mut(child_index);
        let sibling = &mut before[child_index - 1];
        let child = &mut after[0];
        assert!(sibling.has_spare(), "borrow_from_prev: sibling has no spare entry");

        let moved_up = match sibling.entries.pop() {
            Some(entry) => entry,
            None => unreachable!("sibling with a spare entry is non-empty"),
        };
        let moved_down = std::mem::replace(&mut self.entries[child_index - 1], moved_up);
        child.entries.insert(0, moved_down);

        if !child.leaf {
            if let Some(grandchild) = sibling.children.pop() {
                child.children.insert(0, grandchild);
            }
        }
    }

    /// Rotate one entry from the right sibling through this node into the
    /// child at `child_index`.
    ///
    /// # Panics
    ///
    /// If there is no right sibling or it has no spare entry.
    pub fn borrow_from_next(&mut self, child_index: usize) {
        assert!(
            child_index + 1 < self.children.len(),
            "borrow_from_next: child has no right sibling"
        );
        let (before, after) = self.children.split_at_mut(child_index + 1);
        let child = &mut before[child_index];
        let sibling = &mut after[0];
        assert!(sibling.has_spare(), "borrow_from_next: sibling has no spare entry");

        let moved_up = sibling.entries.remove(0);
        let moved_down = std::mem::replace(&mut self.entries[child_index], moved_up);
        child.entries.push(moved_down);

        if !child.leaf {
            child.children.push(sibling.children.remove(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_with(t: usize, keys: &[i32]) -> Box<Node<i32, i32>> {
        let mut node = Node::new_leaf(t);
        for &k in keys {
            node.insert_entry(Entry::new(k, k * 10));
        }
        Box::new(node)
    }

    fn keys(node: &Node<i32, i32>) -> Vec<i32> {
        node.entries().iter().map(|e| *e.key()).collect()
    }

    /// Internal node with the given separators over the given leaves
    fn parent_of(t: usize, separators: &[i32], leaves: Vec<Box<Node<i32, i32>>>) -> Node<i32, i32> {
        let mut node = Node::new_internal(t);
        for &k in separators {
            node.entries.push(Entry::new(k, k * 10));
        }
        node.children = leaves;
        node
    }

    #[test]
    fn test_new_nodes() {
        let leaf: Node<i32, i32> = Node::new_leaf(3);
        assert!(leaf.is_leaf());
        assert!(leaf.is_empty());
        assert_eq!(leaf.max_entries(), 5);
        assert_eq!(leaf.min_entries(), 2);

        let internal: Node<i32, i32> = Node::new_internal(3);
        assert!(!internal.is_leaf());
    }

    #[test]
    #[should_panic(expected = "minimum degree")]
    fn test_degree_one_rejected() {
        let _node: Node<i32, i32> = Node::new_leaf(1);
    }

    #[test]
    fn test_insert_entry_keeps_order() {
        let node = leaf_with(3, &[30, 10, 50, 20, 40]);
        assert_eq!(keys(&node), vec![10, 20, 30, 40, 50]);
        assert!(node.is_full());
    }

    #[test]
    #[should_panic(expected = "node is full")]
    fn test_insert_into_full_node_panics() {
        let mut node = leaf_with(2, &[1, 2, 3]);
        node.insert_entry(Entry::new(4, 40));
    }

    #[test]
    #[should_panic(expected = "already present")]
    fn test_insert_duplicate_panics() {
        let mut node = leaf_with(3, &[1, 2]);
        node.insert_entry(Entry::new(2, 0));
    }

    #[test]
    fn test_search_and_find_key_index() {
        let node = leaf_with(3, &[10, 20, 30]);
        assert_eq!(node.search(&20), Ok(1));
        assert_eq!(node.search(&5), Err(0));
        assert_eq!(node.search(&25), Err(2));
        assert_eq!(node.search(&99), Err(3));
        assert_eq!(node.find_key_index(&30), Some(2));
        assert_eq!(node.find_key_index(&31), None);
    }

    #[test]
    fn test_split_leaf_child() {
        let mut parent = Node::internal_over(leaf_with(3, &[1, 2, 3, 4, 5]));
        parent.split_child(0);

        assert_eq!(keys(&parent), vec![3]);
        assert_eq!(parent.children().len(), 2);
        assert_eq!(keys(parent.child(0)), vec![1, 2]);
        assert_eq!(keys(parent.child(1)), vec![4, 5]);
        assert!(parent.child(1).is_leaf());
    }

    #[test]
    fn test_split_child_shifts_later_children() {
        let mut parent = parent_of(
            2,
            &[10, 20],
            vec![leaf_with(2, &[1]), leaf_with(2, &[11, 12, 13]), leaf_with(2, &[21])],
        );
        parent.split_child(1);

        assert_eq!(keys(&parent), vec![10, 12, 20]);
        let child_keys: Vec<_> = parent.children().iter().map(|c| keys(c)).collect();
        assert_eq!(child_keys, vec![vec![1], vec![11], vec![13], vec![21]]);
    }

    #[test]
    fn test_split_internal_child_moves_children() {
        let grandchildren: Vec<_> = (0..4).map(|i| leaf_with(2, &[i * 10 + 5])).collect();
        let full_child = Box::new(parent_of(2, &[10, 20, 30], grandchildren));
        let mut parent = Node::internal_over(full_child);
        parent.split_child(0);

        assert_eq!(keys(&parent), vec![20]);
        let left = parent.child(0);
        let right = parent.child(1);
        assert_eq!(keys(left), vec![10]);
        assert_eq!(keys(right), vec![30]);
        assert!(!right.is_leaf());
        assert_eq!(left.children().len(), 2);
        assert_eq!(right.children().len(), 2);
        assert_eq!(keys(right.child(0)), vec![25]);
        assert_eq!(keys(right.child(1)), vec![35]);
    }

    #[test]
    #[should_panic(expected = "child is not full")]
    fn test_split_non_full_child_panics() {
        let mut parent = Node::internal_over(leaf_with(3, &[1, 2]));
        parent.split_child(0);
    }

    #[test]
    fn test_merge_children() {
        let mut parent = parent_of(
            3,
            &[10, 20],
            vec![leaf_with(3, &[1, 2]), leaf_with(3, &[11, 12]), leaf_with(3, &[21, 22])],
        );
        parent.merge_children(0);

        assert_eq!(keys(&parent), vec![20]);
        assert_eq!(parent.children().len(), 2);
        assert_eq!(keys(parent.child(0)), vec![1, 2, 10, 11, 12]);
        assert!(parent.child(0).is_full());
        assert_eq!(keys(parent.child(1)), vec![21, 22]);
    }

    #[test]
    fn test_merge_internal_children_keeps_grandchildren() {
        let left = Box::new(parent_of(2, &[5], vec![leaf_with(2, &[1]), leaf_with(2, &[6])]));
        let right = Box::new(parent_of(2, &[15], vec![leaf_with(2, &[11]), leaf_with(2, &[16])]));
        let mut parent = parent_of(2, &[10], vec![left, right]);
        parent.merge_children(0);

        assert!(parent.is_empty());
        let merged = parent.child(0);
        assert_eq!(keys(merged), vec![5, 10, 15]);
        assert_eq!(merged.children().len(), 4);
        assert_eq!(keys(merged.child(2)), vec![11]);
    }

    #[test]
    #[should_panic(expected = "too large")]
    fn test_merge_oversized_panics() {
        let mut parent = parent_of(
            2,
            &[10],
            vec![leaf_with(2, &[1, 2]), leaf_with(2, &[11])],
        );
        parent.merge_children(0);
    }

    #[test]
    fn test_borrow_from_prev_leaf() {
        let mut parent = parent_of(
            3,
            &[10],
            vec![leaf_with(3, &[1, 2, 3, 4]), leaf_with(3, &[11])],
        );
        parent.borrow_from_prev(1);

        assert_eq!(keys(&parent), vec![4]);
        assert_eq!(keys(parent.child(0)), vec![1, 2, 3]);
        assert_eq!(keys(parent.child(1)), vec![10, 11]);
    }

    #[test]
    fn test_borrow_from_next_leaf() {
        let mut parent = parent_of(
            3,
            &[10],
            vec![leaf_with(3, &[1]), leaf_with(3, &[11, 12, 13])],
        );
        parent.borrow_from_next(0);

        assert_eq!(keys(&parent), vec![11]);
        assert_eq!(keys(parent.child(0)), vec![1, 10]);
        assert_eq!(keys(parent.child(1)), vec![12, 13]);
    }

    #[test]
    fn test_borrow_moves_adjoining_child() {
        let left = Box::new(parent_of(
            2,
            &[3, 6],
            vec![leaf_with(2, &[1]), leaf_with(2, &[4]), leaf_with(2, &[7])],
        ));
        let right = Box::new(parent_of(2, &[15], vec![leaf_with(2, &[11]), leaf_with(2, &[16])]));
        let mut parent = parent_of(2, &[10], vec![left, right]);
        parent.borrow_from_prev(1);

        assert_eq!(keys(&parent), vec![6]);
        assert_eq!(keys(parent.child(0)), vec![3]);
        assert_eq!(parent.child(0).children().len(), 2);
        let right = parent.child(1);
        assert_eq!(keys(right), vec![10, 15]);
        assert_eq!(right.children().len(), 3);
        assert_eq!(keys(right.child(0)), vec![7]);

        parent.borrow_from_next(0);
        assert_eq!(keys(&parent), vec![10]);
        assert_eq!(keys(parent.child(0)), vec![3, 6]);
        assert_eq!(keys(parent.child(0).child(2)), vec![7]);
        assert_eq!(keys(parent.child(1)), vec![15]);
        assert_eq!(parent.child(1).children().len(), 2);
    }

    #[test]
    #[should_panic(expected = "no spare entry")]
    fn test_borrow_from_minimal_sibling_panics() {
        let mut parent = parent_of(
            3,
            &[10],
            vec![leaf_with(3, &[1, 2]), leaf_with(3, &[11])],
        );
        parent.borrow_from_prev(1);
    }

    #[test]
    fn test_take_only_child() {
        let mut root = Node::internal_over(leaf_with(2, &[1]));
        let child = root.take_only_child().unwrap();
        assert_eq!(keys(&child), vec![1]);

        let mut leaf = leaf_with(2, &[1]);
        assert!(leaf.take_only_child().is_none());
    }
}
