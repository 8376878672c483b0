//! Immutable symbol index and its on-disk form
//!
//! An [`Index`] is produced once per documentation build and never patched;
//! the next build replaces it wholesale. The persisted JSON carries an
//! explicit schema version so readers can refuse layouts they don't know.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use super::error::StoreError;
use super::normalize::{normalize, IndexKey};
use super::symbol::{IndexEntry, SymbolKind, SymbolRecord};

/// Current schema version of the persisted index
pub const INDEX_SCHEMA_VERSION: u32 = 1;

/// Read-only mapping from normalized key to its entries in build order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    version: u32,
    keys: BTreeMap<IndexKey, Vec<IndexEntry>>,
}

impl Default for Index {
    fn default() -> Self {
        Self {
            version: INDEX_SCHEMA_VERSION,
            keys: BTreeMap::new(),
        }
    }
}

impl Index {
    pub(crate) fn from_groups(keys: BTreeMap<IndexKey, Vec<IndexEntry>>) -> Self {
        Self {
            version: INDEX_SCHEMA_VERSION,
            keys,
        }
    }

    pub(crate) fn into_groups(self) -> BTreeMap<IndexKey, Vec<IndexEntry>> {
        self.keys
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Entries stored under a key, in build order
    pub fn get(&self, key: &IndexKey) -> Option<&[IndexEntry]> {
        self.keys.get(key).map(Vec::as_slice)
    }

    /// Look up by raw text, normalizing it first
    pub fn lookup(&self, name: &str) -> Option<&[IndexEntry]> {
        normalize(name).and_then(|key| self.get(&key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &IndexKey> {
        self.keys.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndexKey, &[IndexEntry])> {
        self.keys.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Total entries across all keys
    pub fn entry_count(&self) -> usize {
        self.keys.values().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let index: Index = serde_json::from_str(json)?;
        if index.version != INDEX_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: index.version,
                expected: INDEX_SCHEMA_VERSION,
            });
        }
        index.validate()?;
        Ok(index)
    }

    /// Check what the builder guarantees: normalized keys, no duplicate entries
    fn validate(&self) -> Result<(), StoreError> {
        for (key, entries) in &self.keys {
            if normalize(key.as_str()).as_ref() != Some(key) {
                return Err(StoreError::UnnormalizedKey {
                    key: key.to_string(),
                });
            }
            let mut seen: HashSet<(&[String], SymbolKind, &str)> = HashSet::new();
            if !entries.iter().all(|entry| seen.insert(entry.identity())) {
                return Err(StoreError::DuplicateEntry {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Write an index to disk, creating parent directories as needed
pub fn save_index(index: &Index, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, index.to_json()?)?;
    Ok(())
}

pub fn load_index(path: &Path) -> Result<Index, StoreError> {
    let json = fs::read_to_string(path)?;
    Index::from_json(&json)
}

/// Read extracted symbol records (a JSON array) in generator order
pub fn load_records(path: &Path) -> Result<Vec<SymbolRecord>, StoreError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
