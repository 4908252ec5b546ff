//! Structural invariant checks.

use super::BTree;
use crate::error::{IndexError, Result};
use crate::node::Node;

impl<K: Ord, V> BTree<K, V> {
    /// Verify every structural invariant of the tree.
    ///
    /// Checks entry counts against the minimum degree (the root is exempt
    /// from the lower bound), strict key order within and across nodes, the
    /// child count of internal nodes, the leaf flag against child occupancy,
    /// equal leaf depth, and the cached `len` and `height`.
    pub fn check_invariants(&self) -> Result<()> {
        let mut leaf_depth = None;
        let count = check_node(&*self.root, true, None, None, 1, &mut leaf_depth)?;

        if count != self.len {
            return Err(IndexError::corruption(format!(
                "tree reports {} entries but holds {}",
                self.len, count
            )));
        }
        if leaf_depth != Some(self.height) {
            return Err(IndexError::corruption(format!(
                "tree reports height {} but leaves are at depth {:?}",
                self.height, leaf_depth
            )));
        }
        Ok(())
    }
}

/// Check one subtree whose keys must lie strictly between `lower` and
/// `upper`; returns the number of entries in it
fn check_node<K: Ord, V>(
    node: &Node<K, V>,
    is_root: bool,
    lower: Option<&K>,
    upper: Option<&K>,
    depth: usize,
    leaf_depth: &mut Option<usize>,
) -> Result<usize> {
    let len = node.len();
    if len > node.max_entries() {
        return Err(IndexError::corruption(format!(
            "node at depth {} holds {} entries (max {})",
            depth,
            len,
            node.max_entries()
        )));
    }
    if !is_root && len < node.min_entries() {
        return Err(IndexError::corruption(format!(
            "node at depth {} holds {} entries (min {})",
            depth,
            len,
            node.min_entries()
        )));
    }
    if is_root && !node.is_leaf() && len == 0 {
        return Err(IndexError::corruption("internal root has no entries"));
    }

    let keys: Vec<&K> = node.entries().iter().map(|e| e.key()).collect();
    if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(IndexError::corruption(format!(
            "entries at depth {} are not strictly increasing",
            depth
        )));
    }
    let out_of_range = keys.iter().any(|k| {
        lower.map_or(false, |lo| *k <= lo) || upper.map_or(false, |hi| *k >= hi)
    });
    if out_of_range {
        return Err(IndexError::corruption(format!(
            "entries at depth {} fall outside their parent's separators",
            depth
        )));
    }

    if node.is_leaf() {
        if !node.children().is_empty() {
            return Err(IndexError::corruption(format!(
                "leaf at depth {} owns {} children",
                depth,
                node.children().len()
            )));
        }
        match *leaf_depth {
            None => *leaf_depth = Some(depth),
            Some(expected) if expected != depth => {
                return Err(IndexError::corruption(format!(
                    "leaf at depth {} but other leaves are at depth {}",
                    depth, expected
                )));
            }
            Some(_) => {}
        }
        return Ok(len);
    }

    if node.children().len() != len + 1 {
        return Err(IndexError::corruption(format!(
            "internal node at depth {} has {} entries but {} children",
            depth,
            len,
            node.children().len()
        )));
    }

    let mut count = len;
    for (i, child) in node.children().iter().enumerate() {
        let child_lower = if i == 0 { lower } else { Some(keys[i - 1]) };
        let child_upper = if i == len { upper } else { Some(keys[i]) };
        count += check_node(&**child, false, child_lower, child_upper, depth + 1, leaf_depth)?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Entry;

    #[test]
    fn test_check_passes_on_valid_trees() {
        let mut btree = BTree::new(2).unwrap();
        btree.check_invariants().unwrap();
        for k in 0..64 {
            btree.insert(k, k);
            btree.check_invariants().unwrap();
        }
    }

    #[test]
    fn test_check_detects_stale_len() {
        let mut btree = BTree::new(2).unwrap();
        btree.insert(1, 1);
        btree.len = 5;
        assert!(matches!(
            btree.check_invariants(),
            Err(IndexError::Corruption(_))
        ));
    }

    #[test]
    fn test_check_detects_stale_height() {
        let mut btree = BTree::new(2).unwrap();
        btree.extend((0..10).map(|k| (k, k)));
        btree.height += 1;
        assert!(btree.check_invariants().is_err());
    }

    #[test]
    fn test_check_detects_misordered_separator() {
        let mut btree = BTree::new(2).unwrap();
        btree.extend((0..10).map(|k| (k, k)));
        // Swap a separator for a key that belongs to another subtree
        let index = btree.root().len() - 1;
        btree.root.replace_entry(index, Entry::new(-5, -5));
        let err = btree.check_invariants().unwrap_err();
        assert!(err.to_string().contains("Corruption"));
    }

    #[test]
    fn test_check_detects_underfull_node() {
        let mut btree = BTree::new(3).unwrap();
        btree.extend((0..10).map(|k| (k, k)));
        // Root [2, 5]; empty the first leaf behind the tree's back
        let leaf = btree.root.child_mut(0);
        leaf.remove_entry(0);
        leaf.remove_entry(0);
        btree.len -= 2;
        let err = btree.check_invariants().unwrap_err();
        assert!(err.to_string().contains("min 2"));
    }
}
