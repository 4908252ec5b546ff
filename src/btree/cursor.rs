//! In-order traversal.
//!
//! The iterator keeps a stack of (node, entry_index) pairs describing the
//! path from the root to the next entry. Nothing is materialized up front,
//! and every call to [`BTree::iter`] starts a fresh traversal.

use std::iter::FusedIterator;

use super::BTree;
use crate::node::Node;

/// An iterator over the entries of a [`BTree`] in key order
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Path to the next entry; the top frame's index is the next entry
    stack: Vec<(&'a Node<K, V>, usize)>,
    /// Entries not yet yielded
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: &'a Node<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.descend_to_leftmost(root);
        iter
    }

    /// Push the path to the leftmost leaf under `node`
    fn descend_to_leftmost(&mut self, mut node: &'a Node<K, V>) {
        loop {
            self.stack.push((node, 0));
            if node.is_leaf() {
                return;
            }
            node = node.child(0);
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, index) = self.stack.last_mut()?;
            let node: &'a Node<K, V> = *node;

            if *index < node.len() {
                let entry = node.entry(*index);
                *index += 1;
                let next_child = *index;

                // Entries of the subtree right of this entry come next
                if !node.is_leaf() {
                    self.descend_to_leftmost(node.child(next_child));
                }
                self.remaining -= 1;
                return Some((entry.key(), entry.value()));
            }

            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> BTree<K, V> {
    /// Iterate over all key-value pairs in sorted order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.len)
    }

    /// Iterate over keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterate over values in key order
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<'a, K, V> IntoIterator for &'a BTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    #[test]
    fn test_iter_empty() {
        let btree: BTree<i32, i32> = BTree::new(2).unwrap();
        let mut iter = btree.iter();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iter_sorted_after_shuffled_inserts() {
        let mut keys: Vec<u32> = (0..500).collect();
        keys.shuffle(&mut StdRng::seed_from_u64(7));

        let mut btree = BTree::new(3).unwrap();
        for &k in &keys {
            btree.insert(k, k * 2);
        }

        let collected: Vec<_> = btree.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<_> = (0..500).map(|k| (k, k * 2)).collect();
        assert_eq!(collected, expected);
    }

    #[test]
    fn test_iter_is_restartable_and_sized() {
        let mut btree = BTree::new(2).unwrap();
        for k in (0..40).rev() {
            btree.insert(k, ());
        }

        let mut iter = btree.iter();
        assert_eq!(iter.len(), 40);
        iter.by_ref().take(15).for_each(drop);
        assert_eq!(iter.len(), 25);
        assert_eq!(iter.next().map(|(k, _)| *k), Some(15));

        // A new traversal starts over from the smallest key
        assert_eq!(btree.iter().next().map(|(k, _)| *k), Some(0));
        assert_eq!(btree.keys().count(), 40);
    }

    #[test]
    fn test_into_iter_for_reference() {
        let mut btree = BTree::new(2).unwrap();
        btree.extend([(3, "c"), (1, "a"), (2, "b")]);

        let mut seen = String::new();
        for (_, v) in &btree {
            seen.push_str(v);
        }
        assert_eq!(seen, "abc");
        assert_eq!(btree.values().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
