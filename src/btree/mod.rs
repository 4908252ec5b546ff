//! B-tree implementation.
//!
//! This module provides an in-memory B-tree that supports:
//! - Point lookups (get, find)
//! - Insertions and updates (insert)
//! - Deletions with top-down rebalancing (remove, delete)
//! - In-order traversal (iter)

mod check;
mod cursor;
mod delete;
mod display;
mod tree;

pub use cursor::Iter;
pub use display::TreeNode;
pub use tree::BTree;
