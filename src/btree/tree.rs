//! B-tree core implementation.
//!
//! This module provides the main BTree struct, which owns the root node and
//! is the only place the height of the tree changes:
//! - insert: split-on-descent insertion, growing the tree at the root
//! - get/find: point lookups
//! - remove/delete: see `delete.rs`, shrinking the tree at the root

use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::trace;

use crate::error::Result;
use crate::node::{Entry, Node};
use crate::types::BTreeConfig;

/// An in-memory B-tree mapping unique keys to values
#[derive(Debug)]
pub struct BTree<K, V> {
    /// Root node; may hold fewer than `t - 1` entries
    pub(super) root: Box<Node<K, V>>,
    /// Minimum degree shared by every node
    min_degree: usize,
    /// Number of entries in the tree
    pub(super) len: usize,
    /// Number of levels (a lone root leaf is height 1)
    pub(super) height: usize,
}

impl<K, V> BTree<K, V> {
    /// Create an empty tree with the given minimum degree
    pub fn new(min_degree: usize) -> Result<Self> {
        Self::with_config(&BTreeConfig::new(min_degree)?)
    }

    /// Create an empty tree from a config
    pub fn with_config(config: &BTreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::empty(config.min_degree))
    }

    fn empty(min_degree: usize) -> Self {
        Self {
            root: Box::new(Node::new_leaf(min_degree)),
            min_degree,
            len: 0,
            height: 1,
        }
    }

    /// Get the minimum degree of the tree
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Number of entries stored
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the height of the tree
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the root node
    pub fn root(&self) -> &Node<K, V> {
        &self.root
    }

    /// Drop every entry, leaving an empty root leaf
    pub fn clear(&mut self) {
        *self = Self::empty(self.min_degree);
    }

    /// Locate the node and slot holding `key`
    pub fn find<Q>(&self, key: &Q) -> Option<(&Node<K, V>, usize)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node: &Node<K, V> = &self.root;
        loop {
            match node.search(key) {
                Ok(index) => return Some((node, index)),
                Err(_) if node.is_leaf() => return None,
                Err(branch) => node = node.child(branch),
            }
        }
    }

    /// Look up a key and return its value
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|(node, index)| node.entry(index).value())
    }

    /// Look up a key and return a mutable reference to its value
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node: &mut Node<K, V> = &mut self.root;
        loop {
            match node.search(key) {
                Ok(index) => return Some(node.value_mut(index)),
                Err(_) if node.is_leaf() => return None,
                Err(branch) => node = node.child_mut(branch),
            }
        }
    }

    /// Check if a key exists
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Split a full root under a new, entry-less root.
    ///
    /// A node cannot split itself: the promoted median needs a parent. The
    /// old root becomes child 0 of the new root, which then splits it.
    pub(super) fn split_root(&mut self) {
        let old_root = std::mem::replace(
            &mut self.root,
            Box::new(Node::new_leaf(self.min_degree)),
        );
        let mut new_root = Node::internal_over(old_root);
        new_root.split_child(0);

        self.root = Box::new(new_root);
        self.height += 1;
        trace!(height = self.height, len = self.len, "split root");
    }

    /// Replace an entry-less internal root by its only child
    pub(super) fn collapse_root(&mut self) {
        if let Some(child) = self.root.take_only_child() {
            self.root = child;
            self.height -= 1;
            trace!(height = self.height, len = self.len, "collapsed root");
        }
    }
}

impl<K: Ord, V> BTree<K, V> {
    /// Insert or update a key-value pair.
    ///
    /// Returns the previous value when the key was already present; the
    /// entry is then overwritten in place (last write wins).
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.root.is_full() {
            self.split_root();
        }

        let replaced = Self::insert_non_full(&mut self.root, Entry::new(key, value));
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    /// Recursive insert into a node known to have room for one more entry
    fn insert_non_full(node: &mut Node<K, V>, entry: Entry<K, V>) -> Option<V> {
        let mut branch = match node.search(entry.key()) {
            Ok(index) => return Some(node.replace_entry(index, entry).into_value()),
            Err(pos) if node.is_leaf() => {
                node.insert_entry_at(pos, entry);
                return None;
            }
            Err(branch) => branch,
        };

        if node.child(branch).is_full() {
            node.split_child(branch);

            // The promoted median now sits at `branch`; re-pick the side
            match entry.key().cmp(node.entry(branch).key()) {
                Ordering::Less => {}
                Ordering::Greater => branch += 1,
                Ordering::Equal => {
                    return Some(node.replace_entry(branch, entry).into_value());
                }
            }
        }

        Self::insert_non_full(node.child_mut(branch), entry)
    }
}

impl<K, V> Default for BTree<K, V> {
    fn default() -> Self {
        Self::empty(BTreeConfig::default().min_degree)
    }
}

impl<K: Ord, V> Extend<(K, V)> for BTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
