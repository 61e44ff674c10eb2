use modeldex::{IndexRecord, Layer, Locator};

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::views::report::diagnostic_line;

/// Full detail of one record, for `lookup`.
pub fn render_record(record: &IndexRecord, color: bool, unicode: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        Icon::Index.colored(color, unicode),
        ColoredText::info(record.locator.as_str()).bold().render(color)
    );
    if record.display_name != record.locator.name() {
        out.push_str(&format!("Name:        {}\n", record.display_name));
    }
    if let Some(description) = &record.description {
        out.push_str(&format!("Description: {}\n", description));
    }
    out.push_str(&format!("File:        {}\n", record.path));
    out.push_str(&format!("Fingerprint: {}\n", record.fingerprint.short()));
    out.push_str(&format!("Closure:     {}\n", record.closure_fingerprint.short()));
    if !record.tags.is_empty() {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        out.push_str(&format!("Tags:        {}\n", tags.join(", ")));
    }

    if !record.attributes.is_empty() {
        out.push_str(&format!("\n{}\n", ColoredText::dim("Attributes:").render(color)));
        for attribute in &record.attributes {
            let nullable = if attribute.nullable { "" } else { " not null" };
            out.push_str(&format!(
                "  {:<24} {}{}\n",
                attribute.name, attribute.data_type, nullable
            ));
        }
    }

    if !record.references.is_empty() {
        out.push_str(&format!("\n{}\n", ColoredText::dim("References:").render(color)));
        for reference in &record.references {
            let target = match &reference.target {
                Some(target) => target.to_string(),
                None => ColoredText::error("unresolved").render(color),
            };
            out.push_str(&format!(
                "  {} {:<12} {} -> {}\n",
                Icon::Arrow.colored(color, unicode),
                reference.kind.to_string(),
                reference.expression,
                target
            ));
        }
    }

    if !record.problems.is_empty() {
        out.push('\n');
        for problem in &record.problems {
            out.push_str(&diagnostic_line(problem, color, unicode));
        }
    }
    out
}

/// One line per record, for `list` and `dependents`.
pub fn render_listing(records: &[&IndexRecord], color: bool, unicode: bool) -> String {
    let mut out = String::new();
    for record in records {
        let icon = if record.is_valid() {
            Icon::Success
        } else {
            Icon::Error
        };
        out.push_str(&format!(
            "{} {}\n",
            icon.colored(color, unicode),
            record.locator
        ));
    }
    out.push_str(
        &ColoredText::dim(format!("{} entities", records.len())).render(color),
    );
    out.push('\n');
    out
}

pub fn render_resolved(reference: &str, context: &Locator, target: &Locator, color: bool) -> String {
    format!(
        "{} {} {}\n{}\n",
        ColoredText::dim(reference).render(color),
        ColoredText::dim("from").render(color),
        ColoredText::dim(context.as_str()).render(color),
        ColoredText::success(target.as_str()).bold().render(color)
    )
}

pub fn render_layer_check(layer: Layer, has_entities: bool, color: bool, unicode: bool) -> String {
    if has_entities {
        format!(
            "{} {} layer holds entity definitions\n",
            Icon::Success.colored(color, unicode),
            layer
        )
    } else {
        format!(
            "{} {} layer is empty\n",
            Icon::Warning.colored(color, unicode),
            layer
        )
    }
}
