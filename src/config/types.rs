//! Configuration types

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Layer, DEFAULT_IGNORE_FILE};

/// Default descriptor file name.
pub const SOLUTION_FILE: &str = "solution.toml";

/// Default index file name, under the base path.
pub const INDEX_FILE: &str = "index.json";

/// Upper bound for the automatically sized worker pool.
pub const MAX_AUTO_WORKERS: usize = 8;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("solution descriptor not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("invalid solution descriptor {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigWarning {
    /// The unknown or problematic key
    pub key: String,
    pub file: PathBuf,
    /// 1-indexed line, if found
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// `solution.toml` as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolutionFile {
    pub base_path: Option<PathBuf>,
    pub index_path: Option<PathBuf>,
    /// 0 = size automatically
    pub workers: usize,
    pub strict: bool,
    pub layers: LayersSection,
    pub discovery: DiscoverySection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayersSection {
    pub raw: Option<PathBuf>,
    pub stage: Option<PathBuf>,
    pub core: Option<PathBuf>,
    pub curated: Option<PathBuf>,
}

impl LayersSection {
    pub fn get(&self, layer: Layer) -> Option<&PathBuf> {
        match layer {
            Layer::Raw => self.raw.as_ref(),
            Layer::Stage => self.stage.as_ref(),
            Layer::Core => self.core.as_ref(),
            Layer::Curated => self.curated.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    pub ignore_file: Option<String>,
}

/// Root directory of each layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRoots {
    pub raw: PathBuf,
    pub stage: PathBuf,
    pub core: PathBuf,
    pub curated: PathBuf,
    /// Layers whose root was set explicitly rather than defaulted
    configured: BTreeSet<Layer>,
}

impl LayerRoots {
    /// Default roots: `<base>/Raw`, `<base>/Stage`, `<base>/Core`, `<base>/Curated`.
    pub fn under(base: &Path) -> Self {
        Self {
            raw: base.join(Layer::Raw.token()),
            stage: base.join(Layer::Stage.token()),
            core: base.join(Layer::Core.token()),
            curated: base.join(Layer::Curated.token()),
            configured: BTreeSet::new(),
        }
    }

    pub fn get(&self, layer: Layer) -> &Path {
        match layer {
            Layer::Raw => &self.raw,
            Layer::Stage => &self.stage,
            Layer::Core => &self.core,
            Layer::Curated => &self.curated,
        }
    }

    /// Override the root of `layer`, marking it as explicitly configured.
    pub fn set(&mut self, layer: Layer, path: PathBuf) {
        match layer {
            Layer::Raw => self.raw = path,
            Layer::Stage => self.stage = path,
            Layer::Core => self.core = path,
            Layer::Curated => self.curated = path,
        }
        self.configured.insert(layer);
    }

    pub fn is_configured(&self, layer: Layer) -> bool {
        self.configured.contains(&layer)
    }

    /// Roots in layering order.
    pub fn iter(&self) -> impl Iterator<Item = (Layer, &Path)> {
        Layer::ALL.into_iter().map(move |layer| (layer, self.get(layer)))
    }
}

/// Resolved solution configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionConfig {
    /// Descriptor the configuration was read from, if any
    pub descriptor: Option<PathBuf>,
    pub base_path: PathBuf,
    pub index_path: PathBuf,
    pub layer_roots: LayerRoots,
    /// 0 = size automatically
    pub workers: usize,
    pub strict: bool,
    pub ignore_file: String,
}

impl SolutionConfig {
    /// Defaults for a solution rooted at `base`.
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base_path = base.into();
        Self {
            descriptor: None,
            index_path: base_path.join(INDEX_FILE),
            layer_roots: LayerRoots::under(&base_path),
            workers: 0,
            strict: false,
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
            base_path,
        }
    }

    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = path.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Number of loader threads to use.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
            .min(MAX_AUTO_WORKERS)
    }
}
