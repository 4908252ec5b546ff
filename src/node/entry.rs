//! Key-value entries.
//!
//! Entries are the records stored within B-tree nodes. An entry is never
//! edited in place: an update replaces the whole entry.

use std::fmt;

/// A key-value pair stored in a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Create a new entry
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// The entry's key
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The entry's value
    pub fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Consume the entry, returning its value
    pub fn into_value(self) -> V {
        self.value
    }

    /// Consume the entry, returning key and value
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.key, self.value)
    }
}
