use modeldex::application::{GenerateOutcome, PlannedArtifact};

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::views::report::ReportView;

pub struct GenerateView<'a> {
    outcome: &'a GenerateOutcome,
    planned: &'a [PlannedArtifact],
    verbose: u8,
}

impl<'a> GenerateView<'a> {
    pub fn new(outcome: &'a GenerateOutcome, planned: &'a [PlannedArtifact], verbose: u8) -> Self {
        Self {
            outcome,
            planned,
            verbose,
        }
    }

    pub fn render(&self, color: bool, unicode: bool) -> String {
        let mut out = ReportView::new(&self.outcome.report, self.verbose).render(color, unicode);
        out.push('\n');

        if self.planned.is_empty() {
            out.push_str(&format!(
                "{} {}\n",
                Icon::Success.colored(color, unicode),
                ColoredText::success("Nothing to generate").render(color)
            ));
        } else {
            out.push_str(&format!("{}\n", ColoredText::dim("Generation plan:").render(color)));
            for artifact in self.planned {
                let icon = if artifact.stale { Icon::Stale } else { Icon::Fresh };
                out.push_str(&format!("  {} {}\n", icon.colored(color, unicode), artifact.locator));
                if self.verbose > 0 {
                    for dependency in &artifact.dependencies {
                        out.push_str(&format!(
                            "      {} {}\n",
                            Icon::Arrow.colored(color, unicode),
                            ColoredText::dim(dependency.as_str()).render(color)
                        ));
                    }
                }
            }
        }

        for locator in &self.outcome.skipped {
            out.push_str(&format!(
                "{} skipped invalid entity {}\n",
                Icon::Warning.colored(color, unicode),
                locator
            ));
        }
        for failure in &self.outcome.failures {
            out.push_str(&format!(
                "{} {}\n",
                Icon::Error.colored(color, unicode),
                ColoredText::error(failure.to_string()).render(color)
            ));
        }
        out
    }
}
