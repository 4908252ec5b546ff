//! # BTree Index
//!
//! An in-memory ordered key-value index built on a balanced multiway search
//! tree (a B-tree), meant to be embedded inside a larger storage engine.
//!
//! ## Architecture
//!
//! - **Node Layer** (`node`): sorted entry storage and the node-local
//!   structural operations (split, merge, borrow)
//! - **B-Tree Layer** (`btree`): insertion with split-on-descent, lookup,
//!   top-down deletion with rebalancing, traversal and invariant checks
//! - **Shared handle** ([`SharedTree`]): the tree behind a readers-writer
//!   lock for callers that need to share it between threads
//!
//! The tree itself does no locking and no I/O.
//!
//! ## Usage
//!
//! ```rust
//! use btree_index::BTree;
//!
//! let mut tree = BTree::new(3)?;
//!
//! // Insert key-value pairs
//! for i in 0..10 {
//!     tree.insert(i, format!("value {}", i));
//! }
//!
//! // Get a value
//! assert_eq!(tree.get(&7).map(String::as_str), Some("value 7"));
//!
//! // Delete a key
//! assert!(tree.delete(&3));
//! assert!(!tree.delete(&3));
//!
//! // In-order traversal
//! for (key, value) in &tree {
//!     println!("{} -> {}", key, value);
//! }
//! # Ok::<(), btree_index::IndexError>(())
//! ```

pub mod btree;
pub mod error;
pub mod node;
pub mod types;

pub use error::{IndexError, Result};
pub use types::{BTreeConfig, DEFAULT_MIN_DEGREE, MIN_DEGREE};

// Re-export main public API
pub use btree::{BTree, Iter, TreeNode};
pub use node::{Entry, Node};

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

/// Index configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// B-tree configuration for node limits
    pub btree_config: BTreeConfig,
}

impl Config {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum degree of the tree
    pub fn min_degree(mut self, min_degree: usize) -> Self {
        self.btree_config.min_degree = min_degree;
        self
    }

    /// Set B-tree configuration
    pub fn btree_config(mut self, config: BTreeConfig) -> Self {
        self.btree_config = config;
        self
    }
}

/// Tree handle shareable across threads
///
/// Lookups take a shared lock and may run concurrently; `put` and `delete`
/// take the exclusive lock, so no reader ever observes a node mid-split or
/// mid-merge. Clones share the same tree.
pub struct SharedTree<K, V> {
    tree: Arc<RwLock<BTree<K, V>>>,
    config: Config,
}

impl<K, V> Clone for SharedTree<K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            config: self.config.clone(),
        }
    }
}

impl<K, V> fmt::Debug for SharedTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTree")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<K: Ord, V> SharedTree<K, V> {
    /// Create an empty shared tree
    pub fn open(config: Config) -> Result<Self> {
        let btree = BTree::with_config(&config.btree_config)?;
        debug!(min_degree = config.btree_config.min_degree, "opened shared tree");

        Ok(Self {
            tree: Arc::new(RwLock::new(btree)),
            config,
        })
    }

    /// Get the current B-tree configuration
    pub fn btree_config(&self) -> BTreeConfig {
        self.config.btree_config.clone()
    }

    /// Get a copy of the value for a key
    ///
    /// Returns `None` if the key does not exist.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        let btree = self.tree.read();
        btree.get(key).cloned()
    }

    /// Insert or update a key-value pair, returning the replaced value
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut btree = self.tree.write();
        btree.insert(key, value)
    }

    /// Delete a key-value pair
    ///
    /// Returns `true` if the key existed and was deleted.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut btree = self.tree.write();
        btree.delete(key)
    }

    /// Check if a key exists
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let btree = self.tree.read();
        btree.contains_key(key)
    }

    /// Snapshot all key-value pairs in sorted order
    pub fn iter(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let btree = self.tree.read();
        btree.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Get statistics about the tree
    pub fn stats(&self) -> TreeStats {
        let btree = self.tree.read();
        TreeStats {
            len: btree.len(),
            height: btree.height(),
            min_degree: btree.min_degree(),
        }
    }

    /// Verify the structural invariants of the tree
    pub fn check_invariants(&self) -> Result<()> {
        let btree = self.tree.read();
        btree.check_invariants()
    }

    /// Export the tree structure for visualization
    pub fn export_tree(&self) -> TreeNode
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        let btree = self.tree.read();
        btree.export_tree()
    }
}

/// Tree statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of entries
    pub len: usize,
    /// Height of the B-tree
    pub height: usize,
    /// Minimum degree of every node
    pub min_degree: usize,
}
