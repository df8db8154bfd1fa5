//! The GPU reference database: normalized name → capability profile.
//!
//! Built offline from a benchmark corpus (see [`crate::corpus`]), bundled as
//! a JSON artifact, and read-only at runtime. Insertion order is preserved
//! so partial-match scans behave the same across loads of the same artifact.

use std::collections::{BTreeMap, HashMap};

use crate::error::Result;
use crate::profile::CapabilityProfile;

#[derive(Debug, Clone, Default)]
pub struct GpuDatabase {
    entries: Vec<(String, CapabilityProfile)>,
    index: HashMap<String, usize>,
}

impl GpuDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. First occurrence wins: a duplicate key is discarded
    /// and `false` is returned.
    pub fn insert(&mut self, key: String, profile: CapabilityProfile) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, profile));
        true
    }

    pub fn get(&self, key: &str) -> Option<&CapabilityProfile> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CapabilityProfile)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, CapabilityProfile)>) -> Self {
        let mut db = Self::new();
        for (k, p) in entries {
            db.insert(k, p);
        }
        db
    }

    /// Parse the JSON artifact. Keys are loaded in sorted order, which makes
    /// iteration deterministic across rebuilds of the same artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        let map: BTreeMap<String, CapabilityProfile> = serde_json::from_str(json)?;
        Ok(Self::from_entries(map))
    }

    /// Serialize back to the JSON artifact shape (sorted keys).
    pub fn to_json(&self) -> Result<String> {
        let map: BTreeMap<&str, &CapabilityProfile> =
            self.entries.iter().map(|(k, p)| (k.as_str(), p)).collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }

    /// Load the database bundled with the crate.
    pub fn load_bundled() -> Result<Self> {
        Self::from_json(include_str!("../../../data/gpu-database.json"))
    }
}
