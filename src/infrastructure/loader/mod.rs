//! Entity loader
//!
//! Turns one definition file into an [`Entity`]: read, parse, check the
//! structure, derive the locator from the file location and fingerprint the
//! normalized definition. The loader never looks at other entities.

mod parallel;
mod schema;
mod source;

use std::fs;
use std::path::{Component, Path};

use serde_json::Value;

use crate::domain::entities::Entity;
use crate::domain::value_objects::{Fingerprint, Locator, SourcePath};
use crate::error::{IndexError, SchemaViolation};
use crate::infrastructure::discovery::EntityFile;

pub use parallel::load_files;
pub use source::FsEntitySource;

/// Load a single definition file.
pub fn load_entity(file: &EntityFile, base_path: &Path) -> Result<Entity, IndexError> {
    let content = fs::read_to_string(&file.path).map_err(|e| IndexError::FileAccess {
        file: file.path.clone(),
        message: e.to_string(),
    })?;

    let document: Value =
        serde_json::from_str(&content).map_err(|e| IndexError::SchemaValidation {
            file: file.path.clone(),
            violations: vec![SchemaViolation::new("", format!("invalid JSON: {}", e))],
        })?;

    let definition =
        schema::check_definition(&document).map_err(|violations| IndexError::SchemaValidation {
            file: file.path.clone(),
            violations,
        })?;

    let (product, module) = product_and_module(file)?;
    let locator = Locator::encode(file.layer, &product, &module, &definition.name).map_err(|e| {
        IndexError::MalformedIdentifier {
            file: file.path.clone(),
            reason: e.to_string(),
        }
    })?;

    Ok(Entity {
        locator,
        display_name: definition.display_name,
        description: definition.description,
        attributes: definition.attributes,
        sources: definition.sources,
        relationships: definition.relationships,
        parameters: definition.parameters,
        tags: definition.tags,
        fingerprint: Fingerprint::from_definition(&document),
        source_path: SourcePath::relative_to(&file.path, base_path),
        path: file.path.clone(),
    })
}

/// Product and module from `<layer root>/<Product>/<Module>/<file>.json`.
fn product_and_module(file: &EntityFile) -> Result<(String, String), IndexError> {
    let relative = file
        .path
        .strip_prefix(&file.layer_root)
        .unwrap_or(&file.path);

    let parts: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    match parts.as_slice() {
        [product, module, _file] => Ok((product.to_string(), module.to_string())),
        _ => Err(IndexError::MalformedIdentifier {
            file: file.path.clone(),
            reason: format!(
                "expected <Product>/<Module>/<file>.{} under the {} layer root, found '{}'",
                crate::infrastructure::discovery::ENTITY_EXTENSION,
                file.layer,
                SourcePath::from_path(relative)
            ),
        }),
    }
}
