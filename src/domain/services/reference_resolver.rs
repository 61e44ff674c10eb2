//! Reference resolution
//!
//! Turns the locator expressions written in a definition into locators of
//! loaded entities, and checks each resolved reference against the layering
//! rules and the target's attributes.
//!
//! Resolution reads the catalog of loaded entities only; it never depends on
//! other entities having been resolved first. Expressions match locators
//! case-insensitively, so two entities whose names differ only in case make
//! a reference to either of them ambiguous.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::entities::{DependencyEdge, Entity, ResolvedReference, Snapshot};
use crate::domain::value_objects::{split_segments, Layer, Locator, SEGMENT_COUNT};
use crate::error::IndexError;

/// Allowed target layers, indexed by `Layer::rank()` of the referring entity.
const LAYERING_RULES: [&[Layer]; 4] = [
    // Raw
    &[],
    // Stage
    &[Layer::Raw],
    // Core
    &[Layer::Stage, Layer::Core],
    // Curated
    &[Layer::Core, Layer::Curated],
];

/// Layers an entity in `layer` may reference.
pub fn allowed_targets(layer: Layer) -> &'static [Layer] {
    LAYERING_RULES[layer.rank()]
}

pub fn may_reference(from: Layer, to: Layer) -> bool {
    allowed_targets(from).contains(&to)
}

/// Every loaded entity, indexed for lookup by locator and by lowercased name.
#[derive(Debug, Default)]
pub struct EntityCatalog<'a> {
    entities: BTreeMap<&'a Locator, &'a Entity>,
    by_name: HashMap<String, Vec<&'a Locator>>,
}

impl<'a> EntityCatalog<'a> {
    /// Build a catalog. Locators are expected to be unique; on a duplicate
    /// the last entity wins.
    pub fn new(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut catalog = Self::default();
        for entity in entities {
            catalog.entities.insert(&entity.locator, entity);
        }
        for locator in catalog.entities.keys().copied() {
            catalog
                .by_name
                .entry(locator.name().to_lowercase())
                .or_default()
                .push(locator);
        }
        catalog
    }

    pub fn get(&self, locator: &Locator) -> Option<&'a Entity> {
        self.entities.get(locator).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// The set of locators a reference can resolve against.
pub trait KnownLocators {
    /// Locators whose trailing segments match `suffix` ignoring case, in
    /// locator order.
    fn suffix_matches(&self, suffix: &[&str]) -> Vec<&Locator>;
}

impl KnownLocators for EntityCatalog<'_> {
    fn suffix_matches(&self, suffix: &[&str]) -> Vec<&Locator> {
        let Some(name) = suffix.last() else {
            return Vec::new();
        };
        self.by_name
            .get(&name.to_lowercase())
            .map(|candidates| {
                candidates
                    .iter()
                    .filter(|l| l.ends_with(suffix))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl KnownLocators for Snapshot {
    fn suffix_matches(&self, suffix: &[&str]) -> Vec<&Locator> {
        self.locators().filter(|l| l.ends_with(suffix)).collect()
    }
}

/// Resolve one locator expression in the context of the referring entity.
///
/// A four-segment expression is fully qualified and matches its locator in
/// any layer. Shorter expressions are matched against the trailing segments
/// of entities in layers up to the context layer, excluding the context
/// entity. More than one match is ambiguous.
pub fn resolve_reference<K: KnownLocators + ?Sized>(
    expression: &str,
    context: &Locator,
    known: &K,
) -> Result<Locator, IndexError> {
    let segments = split_segments(expression)
        .map_err(|e| IndexError::from_locator_error(e, Some(context)))?;

    let candidates: Vec<&Locator> = if segments.len() == SEGMENT_COUNT {
        let locator = Locator::parse(expression)
            .map_err(|e| IndexError::from_locator_error(e, Some(context)))?;
        known
            .suffix_matches(&locator.segments())
            .into_iter()
            .filter(|l| l.layer() == locator.layer())
            .collect()
    } else {
        known
            .suffix_matches(&segments)
            .into_iter()
            .filter(|l| l.layer() <= context.layer() && *l != context)
            .collect()
    };

    match candidates.as_slice() {
        [] => Err(IndexError::UnresolvedReference {
            referrer: context.clone(),
            reference: expression.to_string(),
        }),
        [only] => Ok((*only).clone()),
        many => Err(IndexError::AmbiguousReference {
            referrer: context.clone(),
            reference: expression.to_string(),
            candidates: many.iter().map(|l| (*l).clone()).collect(),
        }),
    }
}

/// Whether `expression` could resolve to `locator` from some context.
///
/// Ignores the layer filter, so it may over-approximate. Used to find
/// entities whose resolution may change when `locator` appears or vanishes.
pub fn could_match(expression: &str, locator: &Locator) -> bool {
    match split_segments(expression) {
        Ok(segments) if segments.len() == SEGMENT_COUNT => {
            Locator::parse(expression).is_ok_and(|l| l.matches(locator))
        }
        Ok(segments) => locator.ends_with(&segments),
        Err(_) => false,
    }
}

/// Result of resolving every reference of one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityResolution {
    pub references: Vec<ResolvedReference>,
    /// Sorted, deduplicated; only edges allowed by the layering rules
    pub edges: Vec<DependencyEdge>,
    /// Reference-level problems (entity retained, flagged invalid)
    pub problems: Vec<IndexError>,
    /// Layering violations, including any reference declared by a Raw entity
    pub fatal: Vec<IndexError>,
}

/// Resolve and check every source and relationship of `entity`.
pub fn resolve_entity(entity: &Entity, catalog: &EntityCatalog<'_>) -> EntityResolution {
    let mut resolution = EntityResolution::default();
    let mut edges: BTreeSet<DependencyEdge> = BTreeSet::new();
    let referrer = &entity.locator;

    // Raw entities may not declare references at all, resolvable or not.
    let references_allowed = !allowed_targets(referrer.layer()).is_empty();

    for decl in entity.references() {
        let mut target = None;

        let outcome = if references_allowed {
            resolve_reference(&decl.expression, referrer, catalog)
        } else {
            Err(IndexError::ReferenceNotAllowed {
                referrer: referrer.clone(),
                referrer_layer: referrer.layer(),
                reference: decl.expression.clone(),
            })
        };

        match outcome {
            Err(err) if err.is_fatal() => resolution.fatal.push(err),
            Err(problem) => resolution.problems.push(problem),
            Ok(resolved) if !may_reference(referrer.layer(), resolved.layer()) => {
                resolution.fatal.push(IndexError::IllegalLayerReference {
                    referrer: referrer.clone(),
                    referrer_layer: referrer.layer(),
                    target_layer: resolved.layer(),
                    target: resolved,
                });
            }
            Ok(resolved) => {
                if let Some(target_entity) = catalog.get(&resolved) {
                    for pair in &decl.mappings {
                        if !target_entity.has_attribute(&pair.referenced) {
                            resolution.problems.push(IndexError::UnknownAttribute {
                                referrer: referrer.clone(),
                                target: resolved.clone(),
                                attribute: pair.referenced.clone(),
                            });
                        }
                    }
                }
                edges.insert(DependencyEdge {
                    from: referrer.clone(),
                    to: resolved.clone(),
                    kind: decl.kind,
                });
                target = Some(resolved);
            }
        }

        resolution.references.push(ResolvedReference {
            kind: decl.kind,
            expression: decl.expression.clone(),
            role: decl.role,
            mappings: decl.mappings.clone(),
            target,
        });
    }

    resolution.edges = edges.into_iter().collect();
    resolution
}

#[cfg(test)]
mod tests;
