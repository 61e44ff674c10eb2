//! Filesystem-backed entity source.

use std::time::Instant;

use crate::config::SolutionConfig;
use crate::domain::ports::{EntitySource, LoadedModel};
use crate::domain::value_objects::Layer;
use crate::error::{ModeldexError, ModeldexResult};
use crate::infrastructure::discovery::{self, Discovery};

use super::load_files;

/// Loads entities from the layer roots of a solution.
#[derive(Debug, Clone)]
pub struct FsEntitySource {
    config: SolutionConfig,
}

impl FsEntitySource {
    pub fn new(config: SolutionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolutionConfig {
        &self.config
    }
}

impl EntitySource for FsEntitySource {
    fn load_all(&self) -> ModeldexResult<LoadedModel> {
        let started = Instant::now();
        let found = discovery::discover(&self.config.layer_roots, &self.config.ignore_file)?;

        let workers = self.config.worker_count();
        let (entities, load_errors) =
            load_files(&found.files, &self.config.base_path, workers);

        tracing::info!(
            files = found.files.len(),
            entities = entities.len(),
            errors = found.errors.len() + load_errors.len(),
            workers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded entity definitions"
        );

        let mut model = LoadedModel::new(&self.config.base_path);
        model.entities = entities;
        model.errors = found.errors;
        model.errors.extend(load_errors);
        model.warnings = found.warnings;
        Ok(model)
    }

    fn layer_has_entities(&self, layer: Layer) -> ModeldexResult<bool> {
        let root = self.config.layer_roots.get(layer);
        if !root.is_dir() {
            if self.config.layer_roots.is_configured(layer) {
                return Err(ModeldexError::LayerRootNotFound {
                    layer,
                    path: root.to_path_buf(),
                });
            }
            return Ok(false);
        }

        let mut found = Discovery::default();
        discovery::discover_layer(layer, root, &self.config.ignore_file, &mut found)?;
        Ok(!found.files.is_empty())
    }
}
