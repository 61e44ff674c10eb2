//! refresh-generate command handler
//!
//! Uses the plan renderer: the CLI reports what a generator would produce.
//! Real generators plug in through `TemplateRenderer`.

use std::path::Path;

use anyhow::Result;
use modeldex::application::{GenerateOutcome, PlannedArtifact};
use modeldex::{refresh_generate, ModeldexError, PlanRenderer};
use serde::Serialize;

use crate::commands::solution::open_coordinator;
use crate::commands::validate::print_report;
use crate::ui::context::UiContext;
use crate::ui::views::generate::GenerateView;

#[derive(Serialize)]
struct GenerateDocument<'a> {
    #[serde(flatten)]
    outcome: &'a GenerateOutcome,
    plan: &'a [PlannedArtifact],
}

pub fn cmd_refresh_generate(
    solution: Option<&Path>,
    full: bool,
    strict: bool,
    ui: &UiContext,
) -> Result<i32> {
    let (mut coordinator, strict) = open_coordinator(solution, strict)?;
    let mut plan = PlanRenderer::new();

    let outcome = match refresh_generate(&mut coordinator, &mut plan, full) {
        Ok(outcome) => outcome,
        Err(ModeldexError::ValidationFailed { report }) => {
            print_report(&report, ui)?;
            return Ok(report.exit_code(strict));
        }
        Err(err) => return Err(err.into()),
    };

    let mut code = outcome.report.exit_code(strict);
    if !outcome.is_success() {
        code = 1;
    }

    if ui.json {
        let document = GenerateDocument {
            outcome: &outcome,
            plan: plan.planned(),
        };
        crate::ui::json::emit("refresh-generate", code == 0, &document)?;
        return Ok(code);
    }

    print!(
        "{}",
        GenerateView::new(&outcome, plan.planned(), ui.verbose).render(ui.color, ui.unicode)
    );
    Ok(code)
}
