use modeldex::{Diagnostic, ValidationReport};

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub struct ReportView<'a> {
    report: &'a ValidationReport,
    verbose: u8,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a ValidationReport, verbose: u8) -> Self {
        Self { report, verbose }
    }

    pub fn render(&self, color: bool, unicode: bool) -> String {
        let report = self.report;
        let mut out = String::new();

        out.push_str(&format!(
            "{} {}\n",
            Icon::Index.colored(color, unicode),
            ColoredText::info("modeldex index").bold().render(color)
        ));
        out.push_str(&format!(
            "Index: {} ({}, {} files)\n\n",
            report.index_path.display(),
            report.mode,
            report.files
        ));

        for (layer, count) in &report.counts {
            out.push_str(&format!("  {:<8} {:>5}\n", layer.token(), count));
        }
        out.push('\n');

        for warning in &report.config_warnings {
            out.push_str(&warning_line(&warning.to_string(), color, unicode));
        }
        for warning in &report.warnings {
            out.push_str(&warning_line(warning, color, unicode));
        }
        for diagnostic in report.diagnostics.iter().filter(|d| !d.is_fatal()) {
            out.push_str(&diagnostic_line(diagnostic, color, unicode));
        }
        for diagnostic in report.diagnostics.iter().filter(|d| d.is_fatal()) {
            out.push_str(&diagnostic_line(diagnostic, color, unicode));
        }
        if report.warning_count() + report.error_count() > 0 {
            out.push('\n');
        }

        out.push_str(&self.summary(color, unicode));

        if self.verbose > 0 && !report.stale.is_empty() {
            out.push_str(&format!("\n{}\n", ColoredText::dim("Stale:").render(color)));
            for locator in &report.stale {
                out.push_str(&format!("  {} {}\n", Icon::Stale.colored(color, unicode), locator));
            }
        }
        if self.verbose > 0 && !report.removed.is_empty() {
            out.push_str(&format!("\n{}\n", ColoredText::dim("Removed:").render(color)));
            for locator in &report.removed {
                out.push_str(&format!("  {} {}\n", Icon::Arrow.colored(color, unicode), locator));
            }
        }
        out
    }

    fn summary(&self, color: bool, unicode: bool) -> String {
        let report = self.report;
        let counts = format!(
            "{} entities, {} error(s), {} warning(s)",
            report.entity_count(),
            report.error_count(),
            report.warning_count()
        );

        let mut out = if report.committed {
            format!(
                "{} {} {}\n",
                Icon::Success.colored(color, unicode),
                ColoredText::success("Index committed:").bold().render(color),
                counts
            )
        } else {
            format!(
                "{} {} {}\n",
                Icon::Fatal.colored(color, unicode),
                ColoredText::error("Index not committed:").bold().render(color),
                report.fatal_summary()
            )
        };

        if report.committed {
            out.push_str(&format!(
                "  {}\n",
                ColoredText::dim(format!(
                    "revalidated {}, reused {}, stale {}, removed {}",
                    report.revalidated.len(),
                    report.reused.len(),
                    report.stale.len(),
                    report.removed.len()
                ))
                .render(color)
            ));
        }
        out
    }
}

fn warning_line(message: &str, color: bool, unicode: bool) -> String {
    format!(
        "{} {}\n",
        Icon::Warning.colored(color, unicode),
        ColoredText::warning(message).render(color)
    )
}

pub fn diagnostic_line(diagnostic: &Diagnostic, color: bool, unicode: bool) -> String {
    let icon = if diagnostic.is_fatal() {
        Icon::Fatal
    } else {
        Icon::Error
    };
    let mut out = format!(
        "{} {} {}\n",
        icon.colored(color, unicode),
        ColoredText::error(diagnostic.kind.as_str()).render(color),
        diagnostic.message
    );
    if let Some(file) = &diagnostic.file {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Arrow.colored(color, unicode),
            ColoredText::dim(file.as_str()).render(color)
        ));
    }
    out
}
