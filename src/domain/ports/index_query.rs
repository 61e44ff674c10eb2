//! IndexQuery port - the read-only contract for downstream consumers
//!
//! Generators and other tools read the index through this trait; they never
//! mutate it.

use crate::domain::entities::{IndexRecord, Snapshot};
use crate::domain::value_objects::{Layer, Locator};
use crate::error::IndexError;

pub trait IndexQuery {
    fn lookup(&self, locator: &Locator) -> Result<&IndexRecord, IndexError>;

    /// Entities that reference `locator` directly, in locator order.
    fn dependents(&self, locator: &Locator) -> Result<Vec<&IndexRecord>, IndexError>;

    /// Entities `locator` references directly, in locator order.
    fn dependencies(&self, locator: &Locator) -> Result<Vec<&IndexRecord>, IndexError>;

    /// All entities, optionally restricted to one layer, in locator order.
    fn all_entities(&self, layer: Option<Layer>) -> Vec<&IndexRecord>;
}

impl IndexQuery for Snapshot {
    fn lookup(&self, locator: &Locator) -> Result<&IndexRecord, IndexError> {
        self.get(locator).ok_or_else(|| IndexError::NotFound {
            locator: locator.to_string(),
        })
    }

    fn dependents(&self, locator: &Locator) -> Result<Vec<&IndexRecord>, IndexError> {
        self.lookup(locator)?;
        Ok(self.dependents_of(locator))
    }

    fn dependencies(&self, locator: &Locator) -> Result<Vec<&IndexRecord>, IndexError> {
        let record = self.lookup(locator)?;
        Ok(record
            .dependencies()
            .into_iter()
            .filter_map(|l| self.get(l))
            .collect())
    }

    fn all_entities(&self, layer: Option<Layer>) -> Vec<&IndexRecord> {
        match layer {
            Some(layer) => self.in_layer(layer).collect(),
            None => self.records().collect(),
        }
    }
}
