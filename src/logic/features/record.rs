//! Feature Record - the named signal set describing one page load
//!
//! A semantic name → value map restricted to the keys in `layout.rs`, so the
//! two extractors cannot silently diverge. A missing key always reads as 0.

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::layout::{feature_index, FEATURE_LAYOUT};

/// Named feature values for one page load.
///
/// Holds the URL-derived half, the DOM-derived half, or the fused union of
/// both. Writes with names outside the schema are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: BTreeMap<&'static str, f64>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature by name. Returns false (and drops the value) for names
    /// outside the schema.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match feature_index(name) {
            Some(i) => {
                self.values.insert(FEATURE_LAYOUT[i], value);
                true
            }
            None => {
                log::debug!("dropping unknown feature '{}'", name);
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Read a feature, treating absence as 0 (fail-open for classification).
    pub fn get_or_zero(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fuse two halves into one record. On key overlap `other` wins; the
    /// URL/DOM key sets are disjoint by construction so this does not arise
    /// in the pipeline.
    pub fn merge(mut self, other: FeatureRecord) -> FeatureRecord {
        self.values.extend(other.values);
        self
    }

    /// Build a record from an untrusted name → value map (the wire form of
    /// `dom_features_ready`). Unknown names are dropped, not errors.
    pub fn from_map(map: BTreeMap<String, f64>) -> Self {
        let mut record = Self::new();
        for (name, value) in map {
            record.set(&name, value);
        }
        record
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter())
    }
}

impl<'de> Deserialize<'de> for FeatureRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, f64>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

// ============================================================================
// TESTS
// ============================================================================
