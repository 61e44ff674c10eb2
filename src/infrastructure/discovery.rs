//! Entity file discovery
//!
//! Walks each layer root recursively and collects `*.json` files. Hidden
//! entries and paths matched by the layer's ignore file are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LayerRoots;
use crate::domain::value_objects::{IgnorePatterns, Layer};
use crate::error::{IndexError, ModeldexError, ModeldexResult};

/// Extension of entity definition files.
pub const ENTITY_EXTENSION: &str = "json";

/// A definition file found under a layer root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFile {
    pub path: PathBuf,
    pub layer: Layer,
    pub layer_root: PathBuf,
}

/// Result of walking the layer roots.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Sorted by path
    pub files: Vec<EntityFile>,
    /// Directories that could not be read
    pub errors: Vec<IndexError>,
    pub warnings: Vec<String>,
}

/// Discover entity files across all layers.
///
/// A missing root is an empty layer unless it was configured explicitly,
/// in which case the scan fails.
pub fn discover(roots: &LayerRoots, ignore_file: &str) -> ModeldexResult<Discovery> {
    let mut discovery = Discovery::default();
    for (layer, root) in roots.iter() {
        if !root.is_dir() {
            if roots.is_configured(layer) {
                return Err(ModeldexError::LayerRootNotFound {
                    layer,
                    path: root.to_path_buf(),
                });
            }
            tracing::warn!(%layer, root = %root.display(), "layer root not found, treating layer as empty");
            discovery.warnings.push(format!(
                "{} layer root not found: {} (layer treated as empty)",
                layer,
                root.display()
            ));
            continue;
        }
        discover_layer(layer, root, ignore_file, &mut discovery)?;
    }
    discovery.files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(discovery)
}

/// Discover the files of a single layer into `discovery`.
pub fn discover_layer(
    layer: Layer,
    root: &Path,
    ignore_file: &str,
    discovery: &mut Discovery,
) -> ModeldexResult<()> {
    let ignore = IgnorePatterns::load(root, ignore_file)?;
    if !ignore.is_empty() {
        tracing::debug!(%layer, patterns = ignore.pattern_count(), "loaded ignore patterns");
    }
    let before = discovery.files.len();
    walk(layer, root, root, &ignore, discovery);
    tracing::debug!(%layer, files = discovery.files.len() - before, "discovered entity files");
    Ok(())
}

fn walk(layer: Layer, root: &Path, current: &Path, ignore: &IgnorePatterns, out: &mut Discovery) {
    let entries = match fs::read_dir(current) {
        Ok(entries) => entries,
        Err(e) => {
            out.errors.push(IndexError::FileAccess {
                file: current.to_path_buf(),
                message: e.to_string(),
            });
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                out.errors.push(IndexError::FileAccess {
                    file: current.to_path_buf(),
                    message: e.to_string(),
                });
                continue;
            }
        };
        let path = entry.path();

        // Skip hidden entries (including the ignore file itself)
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
        {
            continue;
        }

        let is_dir = path.is_dir();
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if ignore.is_ignored(relative, is_dir) {
            continue;
        }

        if is_dir {
            walk(layer, root, &path, ignore, out);
        } else if path
            .extension()
            .map(|e| e == ENTITY_EXTENSION)
            .unwrap_or(false)
        {
            out.files.push(EntityFile {
                path,
                layer,
                layer_root: root.to_path_buf(),
            });
        }
    }
}
