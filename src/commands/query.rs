//! Read-only query handlers: lookup, dependents, dependencies, list,
//! check-layer and resolve.

use std::path::Path;

use anyhow::Result;
use modeldex::{IndexRecord, Layer, Locator};

use crate::commands::solution::open_coordinator;
use crate::ui::context::UiContext;
use crate::ui::views::records::{
    render_layer_check, render_listing, render_record, render_resolved,
};

pub fn cmd_lookup(solution: Option<&Path>, locator: &Locator, ui: &UiContext) -> Result<i32> {
    let (mut coordinator, _) = open_coordinator(solution, false)?;
    let record = coordinator.lookup(locator)?;

    if ui.json {
        crate::ui::json::emit("lookup", true, record)?;
    } else {
        print!("{}", render_record(record, ui.color, ui.unicode));
    }
    Ok(0)
}

pub fn cmd_dependents(
    solution: Option<&Path>,
    locator: &Locator,
    transitive: bool,
    ui: &UiContext,
) -> Result<i32> {
    let (mut coordinator, _) = open_coordinator(solution, false)?;
    let records = coordinator.dependents(locator, transitive)?;
    print_listing("dependents", &records, ui)
}

pub fn cmd_dependencies(solution: Option<&Path>, locator: &Locator, ui: &UiContext) -> Result<i32> {
    let (mut coordinator, _) = open_coordinator(solution, false)?;
    let records = coordinator.dependencies(locator)?;
    print_listing("dependencies", &records, ui)
}

pub fn cmd_list(solution: Option<&Path>, layer: Option<Layer>, ui: &UiContext) -> Result<i32> {
    let (mut coordinator, _) = open_coordinator(solution, false)?;
    let records = coordinator.all_entities(layer)?;
    print_listing("list", &records, ui)
}

pub fn cmd_check_layer(solution: Option<&Path>, layer: Layer, ui: &UiContext) -> Result<i32> {
    let (coordinator, _) = open_coordinator(solution, false)?;
    let has_entities = coordinator.check_layer(layer)?;

    if ui.json {
        let data = serde_json::json!({
            "layer": layer,
            "root": coordinator.config().layer_roots.get(layer),
            "has_entities": has_entities,
        });
        crate::ui::json::emit("check-layer", true, &data)?;
    } else {
        print!("{}", render_layer_check(layer, has_entities, ui.color, ui.unicode));
    }
    Ok(if has_entities { 0 } else { 1 })
}

pub fn cmd_resolve(
    solution: Option<&Path>,
    reference: &str,
    from: &Locator,
    ui: &UiContext,
) -> Result<i32> {
    let (mut coordinator, _) = open_coordinator(solution, false)?;
    let target = coordinator.resolve(reference, from)?;

    if ui.json {
        let data = serde_json::json!({
            "reference": reference,
            "context": from,
            "target": target,
        });
        crate::ui::json::emit("resolve", true, &data)?;
    } else {
        print!("{}", render_resolved(reference, from, &target, ui.color));
    }
    Ok(0)
}

fn print_listing(command: &str, records: &[&IndexRecord], ui: &UiContext) -> Result<i32> {
    if ui.json {
        let locators: Vec<&Locator> = records.iter().map(|r| &r.locator).collect();
        let data = serde_json::json!({ "entities": locators });
        crate::ui::json::emit(command, true, &data)?;
    } else {
        print!("{}", render_listing(records, ui.color, ui.unicode));
    }
    Ok(0)
}
