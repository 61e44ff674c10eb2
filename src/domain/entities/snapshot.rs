//! Index snapshot entity
//!
//! The persisted index: one record per entity, keyed by locator. A snapshot
//! is always reconstructible from the source tree.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Attribute, CardinalityRole, Diagnostic, EdgeKind, MappingPair, ParameterValue};
use crate::domain::value_objects::{Fingerprint, Layer, Locator, SourcePath};

/// Current on-disk format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A directed dependency: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: Locator,
    pub to: Locator,
    pub kind: EdgeKind,
}

/// A declared reference together with its resolution outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReference {
    pub kind: EdgeKind,
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<CardinalityRole>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<MappingPair>,
    /// `None` when resolution failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Locator>,
}

/// One entity in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub locator: Locator,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub path: SourcePath,
    pub fingerprint: Fingerprint,
    pub closure_fingerprint: Fingerprint,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ParameterValue>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ResolvedReference>,
    /// Outgoing edges, sorted and deduplicated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<DependencyEdge>,
    /// Reference-level problems; non-empty means the record is flagged invalid
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<Diagnostic>,
}

impl IndexRecord {
    pub fn layer(&self) -> Layer {
        self.locator.layer()
    }

    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// Distinct locators this record depends on, in locator order.
    pub fn dependencies(&self) -> BTreeSet<&Locator> {
        self.edges.iter().map(|e| &e.to).collect()
    }
}

/// Snapshot of the whole index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub entities: BTreeMap<Locator, IndexRecord>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            entities: BTreeMap::new(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = IndexRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            entities: records
                .into_iter()
                .map(|r| (r.locator.clone(), r))
                .collect(),
        }
    }

    pub fn get(&self, locator: &Locator) -> Option<&IndexRecord> {
        self.entities.get(locator)
    }

    pub fn contains(&self, locator: &Locator) -> bool {
        self.entities.contains_key(locator)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Records in locator order.
    pub fn records(&self) -> impl Iterator<Item = &IndexRecord> {
        self.entities.values()
    }

    pub fn locators(&self) -> impl Iterator<Item = &Locator> {
        self.entities.keys()
    }

    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = &IndexRecord> {
        self.entities.values().filter(move |r| r.layer() == layer)
    }

    /// Reverse adjacency: for each locator, the records that depend on it.
    pub fn reverse_edges(&self) -> BTreeMap<&Locator, BTreeSet<&Locator>> {
        let mut reverse: BTreeMap<&Locator, BTreeSet<&Locator>> = BTreeMap::new();
        for edge in self.entities.values().flat_map(|r| r.edges.iter()) {
            reverse.entry(&edge.to).or_default().insert(&edge.from);
        }
        reverse
    }

    /// Direct dependents of `locator`, in locator order.
    pub fn dependents_of(&self, locator: &Locator) -> Vec<&IndexRecord> {
        self.entities
            .values()
            .filter(|r| r.edges.iter().any(|e| &e.to == locator))
            .collect()
    }

    pub fn counts_by_layer(&self) -> BTreeMap<Layer, usize> {
        let mut counts: BTreeMap<Layer, usize> = Layer::ALL.iter().map(|l| (*l, 0)).collect();
        for record in self.entities.values() {
            *counts.entry(record.layer()).or_default() += 1;
        }
        counts
    }

    /// Records flagged invalid.
    pub fn invalid_records(&self) -> impl Iterator<Item = &IndexRecord> {
        self.entities.values().filter(|r| !r.is_valid())
    }
}
