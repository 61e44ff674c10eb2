//! Index Store
//!
//! Builds index snapshots from a loaded model:
//! 1. Check locator uniqueness
//! 2. Resolve references (all entities, or only the dirty ones on refresh)
//! 3. Build the dependency graph and reject cycles
//! 4. Compute closure fingerprints in topological order
//!
//! A refresh reuses the resolution of entities that cannot have changed. The
//! records themselves are always rebuilt from the current entities, so a
//! refresh and a full rebuild of the same tree produce identical snapshots.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::{
    DependencyEdge, Diagnostic, Entity, IndexRecord, ResolvedReference, Snapshot,
};
use crate::domain::ports::{IndexQuery, LoadedModel};
use crate::domain::services::{could_match, resolve_entity, DependencyGraph, EntityCatalog};
use crate::domain::value_objects::{Fingerprint, Locator};
use crate::error::IndexError;

/// A successfully built snapshot plus what the build found along the way.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub snapshot: Snapshot,
    /// File-level and reference-level diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Entities whose references were resolved in this build
    pub revalidated: Vec<Locator>,
    /// Entities whose resolution was carried over from the previous snapshot
    pub reused: Vec<Locator>,
    /// Dependencies before dependents
    pub order: Vec<Locator>,
}

/// A build that hit a fatal error. Nothing may be committed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{fatal}")]
pub struct BuildFailure {
    /// First fatal error (duplicates, then layering, then cycles)
    pub fatal: IndexError,
    /// Every diagnostic found, fatal ones included
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve and validate a freshly loaded model from scratch.
pub fn full_rebuild(loaded: &LoadedModel) -> Result<BuildOutput, BuildFailure> {
    build(loaded, None)
}

/// Rebuild against `previous`, re-resolving only entities affected by
/// changes since it was committed.
pub fn incremental_refresh(
    previous: &Snapshot,
    loaded: &LoadedModel,
) -> Result<BuildOutput, BuildFailure> {
    build(loaded, Some(previous))
}

pub fn lookup<'s>(snapshot: &'s Snapshot, locator: &Locator) -> Result<&'s IndexRecord, IndexError> {
    snapshot.lookup(locator)
}

/// Entities whose closure fingerprint differs from `previous` (or that are new).
pub fn stale_since(previous: Option<&Snapshot>, current: &Snapshot) -> Vec<Locator> {
    current
        .records()
        .filter(|record| {
            previous
                .and_then(|p| p.get(&record.locator))
                .map(|old| old.closure_fingerprint != record.closure_fingerprint)
                .unwrap_or(true)
        })
        .map(|record| record.locator.clone())
        .collect()
}

/// Entities present in `previous` but gone from `current`.
pub fn removed_since(previous: Option<&Snapshot>, current: &Snapshot) -> Vec<Locator> {
    previous
        .map(|p| {
            p.locators()
                .filter(|l| !current.contains(l))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Resolution outcome of one entity, fresh or carried over.
struct Resolved {
    references: Vec<ResolvedReference>,
    edges: Vec<DependencyEdge>,
    problems: Vec<Diagnostic>,
}

impl Resolved {
    fn from_record(record: &IndexRecord) -> Self {
        Self {
            references: record.references.clone(),
            edges: record.edges.clone(),
            problems: record.problems.clone(),
        }
    }
}

fn build(loaded: &LoadedModel, previous: Option<&Snapshot>) -> Result<BuildOutput, BuildFailure> {
    let base = loaded.base_path.as_path();
    let mut fatal: Vec<IndexError> = Vec::new();

    let (entities, duplicates) = unique_entities(&loaded.entities);
    fatal.extend(duplicates);

    let catalog = EntityCatalog::new(entities.values().copied());
    let dirty = previous.map(|p| dirty_set(p, &entities));

    let mut resolved: BTreeMap<&Locator, Resolved> = BTreeMap::new();
    let mut revalidated = Vec::new();
    let mut reused = Vec::new();

    for (&locator, &entity) in &entities {
        let carried = match (previous, &dirty) {
            (Some(previous), Some(dirty)) if !dirty.contains(locator) => previous.get(locator),
            _ => None,
        };

        match carried {
            Some(record) => {
                reused.push(locator.clone());
                resolved.insert(locator, Resolved::from_record(record));
            }
            None => {
                let resolution = resolve_entity(entity, &catalog);
                fatal.extend(resolution.fatal);
                revalidated.push(locator.clone());
                resolved.insert(
                    locator,
                    Resolved {
                        references: resolution.references,
                        edges: resolution.edges,
                        problems: resolution
                            .problems
                            .iter()
                            .map(|p| Diagnostic::from_error(p, base))
                            .collect(),
                    },
                );
            }
        }
    }

    let graph = DependencyGraph::from_edges(
        entities.keys().copied(),
        resolved.values().flat_map(|r| r.edges.iter()),
    );
    fatal.extend(
        graph
            .detect_cycles()
            .into_iter()
            .map(|cycle| IndexError::CircularDependency { cycle }),
    );

    let mut diagnostics: Vec<Diagnostic> = loaded
        .errors
        .iter()
        .map(|e| Diagnostic::from_error(e, base))
        .collect();
    diagnostics.extend(resolved.values().flat_map(|r| r.problems.iter().cloned()));
    diagnostics.extend(fatal.iter().map(|e| Diagnostic::from_error(e, base)));

    if let Some(first) = fatal.into_iter().next() {
        tracing::debug!(error = %first, diagnostics = diagnostics.len(), "index build failed");
        return Err(BuildFailure {
            fatal: first,
            diagnostics,
        });
    }

    let order = match graph.topological_order() {
        Ok(order) => order,
        Err(fatal) => return Err(BuildFailure { fatal, diagnostics }),
    };

    let mut records: BTreeMap<Locator, IndexRecord> = BTreeMap::new();
    for locator in &order {
        let (Some(&entity), Some(resolution)) = (entities.get(locator), resolved.remove(locator))
        else {
            continue;
        };
        let closure_fingerprint = Fingerprint::closure(
            &entity.fingerprint,
            graph
                .dependencies_of(locator)
                .into_iter()
                .filter_map(|dep| records.get(dep).map(|r| (dep.as_str(), &r.closure_fingerprint))),
        );
        records.insert(locator.clone(), record(entity, resolution, closure_fingerprint));
    }

    tracing::debug!(
        entities = records.len(),
        revalidated = revalidated.len(),
        reused = reused.len(),
        "index built"
    );

    Ok(BuildOutput {
        snapshot: Snapshot::from_records(records.into_values()),
        diagnostics,
        revalidated,
        reused,
        order,
    })
}

fn record(entity: &Entity, resolution: Resolved, closure_fingerprint: Fingerprint) -> IndexRecord {
    IndexRecord {
        locator: entity.locator.clone(),
        display_name: entity.display_name.clone(),
        description: entity.description.clone(),
        path: entity.source_path.clone(),
        fingerprint: entity.fingerprint.clone(),
        closure_fingerprint,
        attributes: entity.attributes.clone(),
        parameters: entity.parameters.clone(),
        tags: entity.tags.clone(),
        references: resolution.references,
        edges: resolution.edges,
        problems: resolution.problems,
    }
}

/// Index entities by locator; the first claim (in path order) wins.
fn unique_entities(entities: &[Entity]) -> (BTreeMap<&Locator, &Entity>, Vec<IndexError>) {
    let mut unique: BTreeMap<&Locator, &Entity> = BTreeMap::new();
    let mut duplicates = Vec::new();
    for entity in entities {
        match unique.get(&entity.locator) {
            Some(first) => duplicates.push(IndexError::DuplicateLocator {
                locator: entity.locator.clone(),
                first: first.path.clone(),
                second: entity.path.clone(),
            }),
            None => {
                unique.insert(&entity.locator, entity);
            }
        }
    }
    (unique, duplicates)
}

/// Entities whose previous resolution cannot be trusted.
///
/// - added, removed and changed entities (fingerprint or path differs)
/// - their transitive dependents in the previous snapshot
/// - entities whose reference expressions could match an added or removed
///   locator, since their resolution (or its ambiguity) may have changed
fn dirty_set(previous: &Snapshot, current: &BTreeMap<&Locator, &Entity>) -> BTreeSet<Locator> {
    let mut seeds: BTreeSet<&Locator> = BTreeSet::new();
    let mut appeared_or_vanished: Vec<&Locator> = Vec::new();

    for (&locator, entity) in current {
        match previous.get(locator) {
            Some(old) if old.fingerprint == entity.fingerprint && old.path == entity.source_path => {}
            Some(_) => {
                seeds.insert(locator);
            }
            None => {
                seeds.insert(locator);
                appeared_or_vanished.push(locator);
            }
        }
    }
    for locator in previous.locators() {
        if !current.contains_key(locator) {
            seeds.insert(locator);
            appeared_or_vanished.push(locator);
        }
    }

    let previous_graph = DependencyGraph::from_edges(
        previous.locators(),
        previous.records().flat_map(|r| r.edges.iter()),
    );
    let mut dirty = previous_graph.transitive_dependents(seeds.iter().copied());
    dirty.extend(seeds.into_iter().cloned());

    if !appeared_or_vanished.is_empty() {
        for record in previous.records() {
            let affected = record.references.iter().any(|reference| {
                appeared_or_vanished
                    .iter()
                    .any(|locator| could_match(&reference.expression, locator))
            });
            if affected {
                dirty.insert(record.locator.clone());
            }
        }
    }

    tracing::debug!(dirty = dirty.len(), "computed dirty set");
    dirty
}
