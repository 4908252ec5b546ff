//! Tree dumps for debugging and visualization.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::BTree;
use crate::node::Node;

/// Node snapshot for visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Whether this is a leaf node
    pub is_leaf: bool,
    /// Keys in this node
    pub keys: Vec<String>,
    /// Values, parallel to `keys`
    pub values: Vec<String>,
    /// Child nodes (only for internal nodes)
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn from_node<K: fmt::Display, V: fmt::Display>(node: &Node<K, V>) -> Self {
        Self {
            is_leaf: node.is_leaf(),
            keys: node.entries().iter().map(|e| e.key().to_string()).collect(),
            values: node.entries().iter().map(|e| e.value().to_string()).collect(),
            children: node.children().iter().map(|c| Self::from_node(&**c)).collect(),
        }
    }
}

impl<K: fmt::Display, V: fmt::Display> BTree<K, V> {
    /// Export the tree structure for visualization
    pub fn export_tree(&self) -> TreeNode {
        TreeNode::from_node(&*self.root)
    }
}

fn write_node<K: fmt::Display, V: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    node: &Node<K, V>,
    depth: usize,
) -> fmt::Result {
    write!(f, "{:indent$}Leaf: {}", "", node.is_leaf(), indent = depth * 2)?;
    for entry in node.entries() {
        write!(f, ", {}", entry)?;
    }
    writeln!(f)?;
    for child in node.children() {
        write_node(f, &**child, depth + 1)?;
    }
    Ok(())
}

/// One line per node in pre-order, indented by depth
impl<K: fmt::Display, V: fmt::Display> fmt::Display for BTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, &*self.root, 0)
    }
}
