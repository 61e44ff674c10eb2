//! EntitySource port - where entity definitions come from
//!
//! The filesystem implementation walks the layer roots; tests can supply
//! entities directly.

use std::path::PathBuf;

use crate::domain::entities::Entity;
use crate::domain::value_objects::Layer;
use crate::error::{IndexError, ModeldexResult};

/// Everything a scan produced: loaded entities plus per-file errors.
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    /// Entities sorted by source path
    pub entities: Vec<Entity>,
    /// File-level errors (access, schema, identifier)
    pub errors: Vec<IndexError>,
    /// Non-error notices, e.g. a layer root that does not exist
    pub warnings: Vec<String>,
    /// Base for relative paths in records and diagnostics
    pub base_path: PathBuf,
}

impl LoadedModel {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Number of files that were examined.
    pub fn file_count(&self) -> usize {
        self.entities.len() + self.errors.len()
    }
}

pub trait EntitySource {
    /// Discover and load every entity definition.
    fn load_all(&self) -> ModeldexResult<LoadedModel>;

    /// Whether the root of `layer` holds at least one entity file.
    fn layer_has_entities(&self, layer: Layer) -> ModeldexResult<bool>;
}
