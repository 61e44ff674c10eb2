//! Generation record
//!
//! The closure fingerprint of every entity as it was when last rendered.
//! Kept apart from the index: validating the index never touches it, so an
//! entity stays pending until a renderer has actually handled it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{IndexRecord, Snapshot};
use crate::domain::value_objects::{Fingerprint, Locator};

pub const GENERATION_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub version: u32,
    #[serde(default)]
    pub entities: BTreeMap<Locator, Fingerprint>,
}

impl Default for GenerationRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationRecord {
    pub fn new() -> Self {
        Self {
            version: GENERATION_VERSION,
            entities: BTreeMap::new(),
        }
    }

    /// Whether `record` was rendered with its current closure.
    pub fn is_current(&self, record: &IndexRecord) -> bool {
        self.entities.get(&record.locator) == Some(&record.closure_fingerprint)
    }

    pub fn mark_rendered(&mut self, record: &IndexRecord) {
        self.entities
            .insert(record.locator.clone(), record.closure_fingerprint.clone());
    }

    /// Forget entities that are no longer indexed.
    pub fn retain_indexed(&mut self, snapshot: &Snapshot) {
        self.entities.retain(|locator, _| snapshot.contains(locator));
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
