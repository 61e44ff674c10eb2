//! Refresh-and-generate use case
//!
//! Validates the index, then hands entities to a [`TemplateRenderer`] in
//! dependency order. Without `full`, only entities whose closure fingerprint
//! differs from the one recorded when they were last rendered are handed
//! over. The record is updated after rendering, so a plain `validate-index`
//! never makes a pending entity look generated.

use serde::Serialize;

use crate::domain::ports::{
    EntitySource, IndexQuery, IndexRepository, RenderError, RenderRequest, TemplateRenderer,
};
use crate::domain::value_objects::Locator;
use crate::error::ModeldexResult;

use super::coordinator::ModelCoordinator;
use super::report::ValidationReport;

/// What a refresh-generate run did.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    pub report: ValidationReport,
    /// Handed to the renderer, in dependency order
    pub rendered: Vec<Locator>,
    /// Invalid entities that were not rendered
    pub skipped: Vec<Locator>,
    #[serde(serialize_with = "serialize_failures")]
    pub failures: Vec<RenderError>,
}

impl GenerateOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn serialize_failures<S: serde::Serializer>(
    failures: &[RenderError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(failures.iter().map(|f| f.to_string()))
}

/// Validate and commit the index, then render what changed since the last
/// generation.
///
/// A fatal validation error stops before anything is rendered. Render
/// failures are collected; the remaining entities are still rendered, and
/// failed or skipped entities stay pending for the next run.
pub fn refresh_generate<S, R, T>(
    coordinator: &mut ModelCoordinator<S, R>,
    renderer: &mut T,
    full: bool,
) -> ModeldexResult<GenerateOutcome>
where
    S: EntitySource,
    R: IndexRepository,
    T: TemplateRenderer + ?Sized,
{
    let report = coordinator.validate_index(full)?;
    let order = coordinator.build_order().to_vec();
    let mut generation = coordinator.generation()?;
    let generated_before = generation.clone();
    let snapshot = coordinator.index()?;

    let mut rendered = Vec::new();
    let mut skipped = Vec::new();
    let mut failures = Vec::new();

    for locator in &order {
        let record = snapshot.lookup(locator)?;
        let is_stale = !generation.is_current(record);
        if !full && !is_stale {
            continue;
        }
        if !record.is_valid() {
            tracing::warn!(%locator, "skipping invalid entity");
            skipped.push(locator.clone());
            continue;
        }

        let request = RenderRequest {
            record,
            dependencies: snapshot.dependencies(locator)?,
            stale: is_stale,
        };
        match renderer.render(&request) {
            Ok(()) => {
                generation.mark_rendered(record);
                rendered.push(locator.clone());
            }
            Err(err) => {
                tracing::warn!(error = %err, "render failed");
                failures.push(err);
            }
        }
    }

    generation.retain_indexed(snapshot);
    if generation != generated_before {
        coordinator.record_generation(&generation)?;
    }

    tracing::info!(
        rendered = rendered.len(),
        skipped = skipped.len(),
        failed = failures.len(),
        "generation finished"
    );

    Ok(GenerateOutcome {
        report,
        rendered,
        skipped,
        failures,
    })
}

/// One line of a generation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedArtifact {
    pub locator: Locator,
    pub stale: bool,
    pub dependencies: Vec<Locator>,
}

/// Renderer that records what would be generated instead of generating it.
#[derive(Debug, Default)]
pub struct PlanRenderer {
    planned: Vec<PlannedArtifact>,
}

impl PlanRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn planned(&self) -> &[PlannedArtifact] {
        &self.planned
    }

    pub fn into_planned(self) -> Vec<PlannedArtifact> {
        self.planned
    }
}

impl TemplateRenderer for PlanRenderer {
    fn render(&mut self, request: &RenderRequest<'_>) -> Result<(), RenderError> {
        self.planned.push(PlannedArtifact {
            locator: request.record.locator.clone(),
            stale: request.stale,
            dependencies: request
                .dependencies
                .iter()
                .map(|r| r.locator.clone())
                .collect(),
        });
        Ok(())
    }
}
