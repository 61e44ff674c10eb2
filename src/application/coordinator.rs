//! Model Coordinator
//!
//! Owns the index for one run: loads the entity tree, builds a snapshot
//! (full or incremental), commits it and answers read-only queries.
//!
//! Only the coordinator writes the index. A failed validation leaves the
//! stored index at its last good state.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;

use crate::config::{ConfigWarning, SolutionConfig};
use crate::domain::entities::{Diagnostic, GenerationRecord, IndexRecord, Snapshot};
use crate::domain::ports::{
    EntitySource, IndexQuery, IndexRepository, IndexStoreError, LoadedModel,
};
use crate::domain::services::{resolve_reference, DependencyGraph};
use crate::domain::value_objects::{Fingerprint, Layer, Locator, SourcePath};
use crate::error::{ModeldexError, ModeldexResult};
use crate::infrastructure::{FsEntitySource, JsonIndexRepository};

use super::index_store::{
    full_rebuild, incremental_refresh, removed_since, stale_since, BuildOutput,
};
use super::report::{IndexMode, ValidationReport};

/// State carried through one coordinator run.
///
/// Holds the last committed snapshot (loaded lazily) and the fingerprint of
/// every file observed by the most recent scan.
#[derive(Debug, Default)]
pub struct RunCache {
    previous: Option<Snapshot>,
    /// Whether the repository has been asked for a snapshot yet
    loaded: bool,
    fingerprints: BTreeMap<SourcePath, Fingerprint>,
}

impl RunCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known snapshot instead of reading the repository.
    pub fn with_previous(snapshot: Snapshot) -> Self {
        Self {
            previous: Some(snapshot),
            loaded: true,
            fingerprints: BTreeMap::new(),
        }
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Fingerprint of a file seen by the last scan.
    pub fn fingerprint(&self, path: &SourcePath) -> Option<&Fingerprint> {
        self.fingerprints.get(path)
    }

    pub fn observed_files(&self) -> usize {
        self.fingerprints.len()
    }

    fn observe(&mut self, loaded: &LoadedModel) {
        self.fingerprints = loaded
            .entities
            .iter()
            .map(|e| (e.source_path.clone(), e.fingerprint.clone()))
            .collect();
    }
}

/// Coordinates loading, validation, commit and queries.
pub struct ModelCoordinator<S, R>
where
    S: EntitySource,
    R: IndexRepository,
{
    config: SolutionConfig,
    source: S,
    repository: R,
    cache: RunCache,
    config_warnings: Vec<ConfigWarning>,
    order: Vec<Locator>,
}

impl ModelCoordinator<FsEntitySource, JsonIndexRepository> {
    /// Coordinator over the filesystem layout described by `config`.
    pub fn open(config: SolutionConfig) -> Self {
        let source = FsEntitySource::new(config.clone());
        let repository = JsonIndexRepository::new(config.index_path.clone());
        Self::new(config, source, repository, RunCache::new())
    }
}

impl<S, R> ModelCoordinator<S, R>
where
    S: EntitySource,
    R: IndexRepository,
{
    pub fn new(config: SolutionConfig, source: S, repository: R, cache: RunCache) -> Self {
        Self {
            config,
            source,
            repository,
            cache,
            config_warnings: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Attach descriptor warnings so they appear in reports.
    pub fn with_config_warnings(mut self, warnings: Vec<ConfigWarning>) -> Self {
        self.config_warnings = warnings;
        self
    }

    pub fn config(&self) -> &SolutionConfig {
        &self.config
    }

    pub fn cache(&self) -> &RunCache {
        &self.cache
    }

    /// Topological order of the last committed build (empty before one).
    pub fn build_order(&self) -> &[Locator] {
        &self.order
    }

    /// Scan, validate and commit the index.
    ///
    /// Incremental unless `full_scan` is set or no usable previous index
    /// exists. On a fatal error nothing is written and the report comes back
    /// inside [`ModeldexError::ValidationFailed`].
    pub fn validate_index(&mut self, full_scan: bool) -> ModeldexResult<ValidationReport> {
        let started = Instant::now();
        let loaded = self.source.load_all()?;
        self.cache.observe(&loaded);

        let mut warnings = Vec::new();
        let previous = self.take_previous(full_scan, &mut warnings)?;
        warnings.extend(loaded.warnings.iter().cloned());

        let mode = match (&previous, full_scan) {
            (Some(_), false) => IndexMode::Incremental,
            _ => IndexMode::Full,
        };
        tracing::info!(%mode, files = self.cache.observed_files(), "validating index");

        let built = match (&previous, mode) {
            (Some(previous), IndexMode::Incremental) => incremental_refresh(previous, &loaded),
            _ => full_rebuild(&loaded),
        };

        let mut report = ValidationReport::new(mode, self.repository.location());
        report.files = loaded.file_count();
        report.warnings = warnings;
        report.config_warnings = self.config_warnings.clone();

        match built {
            Ok(output) => {
                if let Err(err) = self.repository.save(&output.snapshot) {
                    self.cache.previous = previous;
                    return Err(err.into());
                }
                self.commit(&mut report, previous.as_ref(), output);
                tracing::info!(
                    entities = report.entity_count(),
                    errors = report.error_count(),
                    revalidated = report.revalidated.len(),
                    reused = report.reused.len(),
                    stale = report.stale.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "index committed"
                );
                Ok(report)
            }
            Err(failure) => {
                report.counts = count_by_layer(&loaded);
                report.fatal = Some(Diagnostic::from_error(&failure.fatal, &loaded.base_path));
                report.diagnostics = failure.diagnostics;
                report.finished_at = Utc::now();
                tracing::warn!(error = %failure.fatal, "validation failed, stored index left untouched");
                self.cache.previous = previous;
                Err(ModeldexError::ValidationFailed {
                    report: Box::new(report),
                })
            }
        }
    }

    /// The committed index, loading it on first use.
    pub fn index(&mut self) -> ModeldexResult<&Snapshot> {
        if self.cache.previous.is_none() {
            self.cache.loaded = true;
            self.cache.previous = self.repository.load()?;
        }
        self.cache.previous.as_ref().ok_or_else(|| {
            IndexStoreError::Missing {
                path: self.repository.location(),
            }
            .into()
        })
    }

    pub fn lookup(&mut self, locator: &Locator) -> ModeldexResult<&IndexRecord> {
        Ok(self.index()?.lookup(locator)?)
    }

    /// Entities that reference `locator`; with `transitive`, also their
    /// dependents, recursively.
    pub fn dependents(
        &mut self,
        locator: &Locator,
        transitive: bool,
    ) -> ModeldexResult<Vec<&IndexRecord>> {
        let snapshot = self.index()?;
        if !transitive {
            return Ok(snapshot.dependents(locator)?);
        }
        snapshot.lookup(locator)?;
        let graph = DependencyGraph::from_edges(
            snapshot.locators(),
            snapshot.records().flat_map(|r| r.edges.iter()),
        );
        Ok(graph
            .transitive_dependents([locator])
            .iter()
            .filter_map(|l| snapshot.get(l))
            .collect())
    }

    pub fn dependencies(&mut self, locator: &Locator) -> ModeldexResult<Vec<&IndexRecord>> {
        Ok(self.index()?.dependencies(locator)?)
    }

    pub fn all_entities(&mut self, layer: Option<Layer>) -> ModeldexResult<Vec<&IndexRecord>> {
        Ok(self.index()?.all_entities(layer))
    }

    /// Resolve a reference expression as if written in `context`.
    pub fn resolve(&mut self, reference: &str, context: &Locator) -> ModeldexResult<Locator> {
        let snapshot = self.index()?;
        snapshot.lookup(context)?;
        Ok(resolve_reference(reference, context, snapshot)?)
    }

    /// What was rendered last, per entity.
    ///
    /// An unreadable record counts as empty, so everything is rendered again.
    pub fn generation(&self) -> ModeldexResult<GenerationRecord> {
        match self.repository.load_generation() {
            Ok(record) => Ok(record),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(error = %err, "generation record unusable, rendering everything");
                Ok(GenerationRecord::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn record_generation(&self, record: &GenerationRecord) -> ModeldexResult<()> {
        Ok(self.repository.save_generation(record)?)
    }

    /// Whether the root of `layer` holds any entity definitions.
    pub fn check_layer(&self, layer: Layer) -> ModeldexResult<bool> {
        self.source.layer_has_entities(layer)
    }

    /// Previous snapshot for this run, read from the repository once.
    fn take_previous(
        &mut self,
        full_scan: bool,
        warnings: &mut Vec<String>,
    ) -> ModeldexResult<Option<Snapshot>> {
        if let Some(snapshot) = self.cache.previous.take() {
            return Ok(Some(snapshot));
        }
        if self.cache.loaded {
            return Ok(None);
        }
        self.cache.loaded = true;

        match self.repository.load() {
            Ok(snapshot) => Ok(snapshot),
            Err(err) if full_scan || err.is_recoverable() => {
                tracing::warn!(error = %err, "previous index unusable, rebuilding from scratch");
                warnings.push(format!("{} (rebuilt from scratch)", err));
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn commit(
        &mut self,
        report: &mut ValidationReport,
        previous: Option<&Snapshot>,
        output: BuildOutput,
    ) {
        report.committed = true;
        report.counts = output.snapshot.counts_by_layer();
        report.diagnostics = output.diagnostics;
        report.revalidated = output.revalidated;
        report.reused = output.reused;
        report.stale = stale_since(previous, &output.snapshot);
        report.removed = removed_since(previous, &output.snapshot);
        report.finished_at = Utc::now();

        self.order = output.order;
        self.cache.previous = Some(output.snapshot);
    }
}

fn count_by_layer(loaded: &LoadedModel) -> BTreeMap<Layer, usize> {
    let mut counts: BTreeMap<Layer, usize> = Layer::ALL.iter().map(|l| (*l, 0)).collect();
    for entity in &loaded.entities {
        *counts.entry(entity.layer()).or_default() += 1;
    }
    counts
}
