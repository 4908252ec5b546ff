//! B-tree deletion.
//!
//! Deletion runs as a single top-down pass. Before descending into a child,
//! the child is grown to at least `t` entries (by borrowing from a sibling or
//! merging with one), so that removing one entry further down can never
//! leave a node below `t - 1` entries. Nothing is repaired on the way back up.
//!
//! The cases, for the node currently visited:
//! 1. key here, leaf: remove it.
//! 2. key here, internal:
//!    a. left child has `t` entries: replace with predecessor, delete it below
//!    b. right child has `t` entries: replace with successor, delete it below
//!    c. otherwise merge both children around the key and recurse into them
//! 3. key absent, leaf: not found.
//! 4. key absent, internal: grow the branch child if minimal, then recurse.
//!
//! A merge at the root may leave it without entries; the tree then replaces
//! the root with its only child, which is the only way the height shrinks.

use std::borrow::Borrow;

use super::BTree;
use crate::node::{Entry, Node};

impl<K: Ord, V> BTree<K, V> {
    /// Remove a key, returning its value if it was present.
    ///
    /// A missing key leaves the tree untouched: no borrow or merge is
    /// performed on its behalf.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains_key(key) {
            return None;
        }

        let removed = Self::remove_from(&mut self.root, key);
        if removed.is_some() {
            self.len -= 1;
        }
        if self.root.is_empty() {
            self.collapse_root();
        }
        removed
    }

    /// Delete a key.
    ///
    /// Returns true if the key was found and deleted.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key).is_some()
    }

    /// Recursive delete from a node that can afford to lose one entry
    fn remove_from<Q>(node: &mut Node<K, V>, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match node.search(key) {
            // Case 1
            Ok(index) if node.is_leaf() => Some(node.remove_entry(index).into_value()),
            // Case 2
            Ok(index) => Self::remove_inner_entry(node, index, key),
            // Case 3
            Err(_) if node.is_leaf() => None,
            // Case 4
            Err(branch) => {
                let branch = Self::grow_child(node, branch);
                Self::remove_from(node.child_mut(branch), key)
            }
        }
    }

    /// Delete the entry at `index` of an internal node
    fn remove_inner_entry<Q>(node: &mut Node<K, V>, index: usize, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if node.child(index).has_spare() {
            let predecessor = Self::remove_max(node.child_mut(index))?;
            return Some(node.replace_entry(index, predecessor).into_value());
        }

        if node.child(index + 1).has_spare() {
            let successor = Self::remove_min(node.child_mut(index + 1))?;
            return Some(node.replace_entry(index, successor).into_value());
        }

        // The key moves down into the merged child
        node.merge_children(index);
        Self::remove_from(node.child_mut(index), key)
    }

    /// Remove the largest entry of a subtree whose root has a spare entry
    fn remove_max(node: &mut Node<K, V>) -> Option<Entry<K, V>> {
        if node.is_leaf() {
            return node.pop_last_entry();
        }
        let last = node.len();
        let branch = Self::grow_child(node, last);
        Self::remove_max(node.child_mut(branch))
    }

    /// Remove the smallest entry of a subtree whose root has a spare entry
    fn remove_min(node: &mut Node<K, V>) -> Option<Entry<K, V>> {
        if node.is_leaf() {
            return node.pop_first_entry();
        }
        let branch = Self::grow_child(node, 0);
        Self::remove_min(node.child_mut(branch))
    }

    /// Ensure the child at `index` holds at least `t` entries.
    ///
    /// Borrowing from an adjacent sibling is preferred; when both siblings
    /// are minimal the child is merged with one of them. Returns the index
    /// of the child that now covers the original branch, which moves one to
    /// the left when the child was merged into its left sibling.
    fn grow_child(node: &mut Node<K, V>, index: usize) -> usize {
        if node.child(index).has_spare() {
            return index;
        }

        if index > 0 && node.child(index - 1).has_spare() {
            node.borrow_from_prev(index);
            index
        } else if index < node.len() && node.child(index + 1).has_spare() {
            node.borrow_from_next(index);
            index
        } else if index < node.len() {
            node.merge_children(index);
            index
        } else {
            node.merge_children(index - 1);
            index - 1
        }
    }
}
