//! validate-index command handler

use std::path::Path;

use anyhow::Result;
use modeldex::{ModeldexError, ValidationReport};

use crate::commands::solution::open_coordinator;
use crate::ui::context::UiContext;
use crate::ui::views::report::ReportView;

pub fn cmd_validate_index(
    solution: Option<&Path>,
    full: bool,
    strict: bool,
    ui: &UiContext,
) -> Result<i32> {
    let (mut coordinator, strict) = open_coordinator(solution, strict)?;

    let report = match coordinator.validate_index(full) {
        Ok(report) => report,
        Err(ModeldexError::ValidationFailed { report }) => *report,
        Err(err) => return Err(err.into()),
    };

    print_report(&report, ui)?;
    Ok(report.exit_code(strict))
}

pub(crate) fn print_report(report: &ValidationReport, ui: &UiContext) -> Result<()> {
    if ui.json {
        crate::ui::json::emit("validate-index", report.is_success(), report)?;
        return Ok(());
    }

    if ui.annotate() {
        for diagnostic in &report.diagnostics {
            println!("{}", crate::ui::ci::diagnostic_annotation(diagnostic));
        }
    }
    print!(
        "{}",
        ReportView::new(report, ui.verbose).render(ui.color, ui.unicode)
    );
    Ok(())
}
