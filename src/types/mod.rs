//! Common types used throughout the index.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};

/// Smallest legal minimum degree.
/// With t = 2 every node holds 1..=3 entries and 2..=4 children.
pub const MIN_DEGREE: usize = 2;

/// Default minimum degree (capacity of five entries per node)
pub const DEFAULT_MIN_DEGREE: usize = 3;

/// Maximum entries a node may hold for the given minimum degree
pub const fn max_entries(min_degree: usize) -> usize {
    2 * min_degree - 1
}

/// Minimum entries a non-root node must hold for the given minimum degree
pub const fn min_entries(min_degree: usize) -> usize {
    min_degree - 1
}

/// BTree configuration controlling the branching factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BTreeConfig {
    /// Minimum degree `t`: non-root nodes hold `t - 1 ..= 2t - 1` entries
    pub min_degree: usize,
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
        }
    }
}

impl BTreeConfig {
    /// Create a new config, rejecting degrees below [`MIN_DEGREE`]
    pub fn new(min_degree: usize) -> Result<Self> {
        let config = Self { min_degree };
        config.validate()?;
        Ok(config)
    }

    /// Check that the config describes a legal tree
    pub fn validate(&self) -> Result<()> {
        if self.min_degree < MIN_DEGREE {
            return Err(IndexError::InvalidMinDegree(self.min_degree));
        }
        Ok(())
    }

    /// Parse and validate a config from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Entry capacity of every node (`2t - 1`)
    pub fn max_entries(&self) -> usize {
        max_entries(self.min_degree)
    }

    /// Entry floor of every non-root node (`t - 1`)
    pub fn min_entries(&self) -> usize {
        min_entries(self.min_degree)
    }
}
