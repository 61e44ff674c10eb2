use super::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::domain::entities::{
    Attribute, CardinalityRole, EdgeKind, MappingPair, ReferenceDecl,
};
use crate::domain::value_objects::{Fingerprint, SourcePath};

fn loc(s: &str) -> Locator {
    Locator::parse(s).unwrap()
}

fn entity(locator: &str, attributes: &[&str], sources: Vec<ReferenceDecl>) -> Entity {
    Entity {
        locator: loc(locator),
        display_name: loc(locator).name().to_string(),
        description: None,
        attributes: attributes
            .iter()
            .map(|name| Attribute {
                name: name.to_string(),
                data_type: "string".to_string(),
                nullable: true,
                precision: None,
                scale: None,
                attribute_type: None,
            })
            .collect(),
        sources,
        relationships: Vec::new(),
        parameters: BTreeMap::new(),
        tags: BTreeSet::new(),
        fingerprint: Fingerprint::from_bytes(locator.as_bytes()),
        path: PathBuf::from(format!("{}.json", locator)),
        source_path: SourcePath::from(locator),
    }
}

fn source(expr: &str) -> ReferenceDecl {
    ReferenceDecl::source(expr, Vec::new())
}

#[test]
fn layering_rule_table() {
    assert!(allowed_targets(Layer::Raw).is_empty());
    assert_eq!(allowed_targets(Layer::Stage), &[Layer::Raw]);
    assert_eq!(allowed_targets(Layer::Core), &[Layer::Stage, Layer::Core]);
    assert_eq!(allowed_targets(Layer::Curated), &[Layer::Core, Layer::Curated]);

    assert!(!may_reference(Layer::Core, Layer::Raw));
    assert!(!may_reference(Layer::Stage, Layer::Stage));
    assert!(may_reference(Layer::Curated, Layer::Curated));
}

#[test]
fn fully_qualified_reference_matches_exactly() {
    let raw = entity("/Raw/Sales/Customer/Customer", &["id"], vec![]);
    let catalog = EntityCatalog::new([&raw]);
    let context = loc("/Stage/Sales/Customer/Customer");

    let resolved = resolve_reference("/Raw/Sales/Customer/Customer", &context, &catalog).unwrap();
    assert_eq!(resolved, raw.locator);

    // layer token is case-insensitive, the leading slash optional
    let resolved = resolve_reference("raw/Sales/Customer/Customer", &context, &catalog).unwrap();
    assert_eq!(resolved, raw.locator);
}

#[test]
fn references_match_regardless_of_case() {
    let raw = entity("/Raw/Sales/Customer/Customer", &["id"], vec![]);
    let catalog = EntityCatalog::new([&raw]);
    let context = loc("/Stage/Sales/Customer/Customer");

    for expr in [
        "/raw/sales/customer/customer",
        "RAW/SALES/CUSTOMER/CUSTOMER",
        "customer",
        "sales/customer/CUSTOMER",
    ] {
        assert_eq!(
            resolve_reference(expr, &context, &catalog).unwrap(),
            raw.locator,
            "expression {expr}"
        );
    }
    assert!(could_match("/raw/sales/customer/customer", &raw.locator));
}

#[test]
fn names_differing_only_in_case_are_ambiguous() {
    let upper = entity("/Raw/Sales/Customer/Customer", &[], vec![]);
    let lower = entity("/Raw/Sales/customer/customer", &[], vec![]);
    let catalog = EntityCatalog::new([&upper, &lower]);
    let context = loc("/Stage/Sales/Customer/Customer");

    for expr in ["/Raw/Sales/Customer/Customer", "Customer"] {
        match resolve_reference(expr, &context, &catalog).unwrap_err() {
            IndexError::AmbiguousReference { candidates, .. } => {
                assert_eq!(candidates, vec![upper.locator.clone(), lower.locator.clone()]);
            }
            other => panic!("expected ambiguous reference for {expr}, got {other:?}"),
        }
    }
}

#[test]
fn fully_qualified_reference_to_missing_entity_is_unresolved() {
    let catalog = EntityCatalog::new(std::iter::empty());
    let err = resolve_reference(
        "/Raw/Sales/Customer/Customer",
        &loc("/Stage/Sales/Customer/Customer"),
        &catalog,
    )
    .unwrap_err();
    assert!(matches!(err, IndexError::UnresolvedReference { .. }));
}

#[test]
fn partial_reference_matches_suffix() {
    let raw = entity("/Raw/Sales/Customer/Customer", &[], vec![]);
    let catalog = EntityCatalog::new([&raw]);
    let context = loc("/Stage/Sales/Customer/Customer");

    for expr in ["Customer", "Customer/Customer", "Sales/Customer/Customer"] {
        assert_eq!(
            resolve_reference(expr, &context, &catalog).unwrap(),
            raw.locator,
            "expression {expr}"
        );
    }
}

#[test]
fn partial_reference_excludes_higher_layers_and_self() {
    let stage = entity("/Stage/Sales/Customer/Customer", &[], vec![]);
    let core = entity("/Core/Sales/Customer/Customer", &[], vec![]);
    let catalog = EntityCatalog::new([&stage, &core]);

    // From Stage: Core is above, Stage itself is excluded.
    let err = resolve_reference("Customer", &stage.locator, &catalog).unwrap_err();
    assert!(matches!(err, IndexError::UnresolvedReference { .. }));

    // From Core: only the Stage entity is a candidate.
    let resolved = resolve_reference("Customer", &core.locator, &catalog).unwrap();
    assert_eq!(resolved, stage.locator);
}

#[test]
fn partial_reference_with_two_matches_is_ambiguous() {
    let a = entity("/Raw/Sales/Customer/Customer", &[], vec![]);
    let b = entity("/Raw/Finance/Customer/Customer", &[], vec![]);
    let catalog = EntityCatalog::new([&a, &b]);

    let err =
        resolve_reference("Customer/Customer", &loc("/Stage/X/Y/Z"), &catalog).unwrap_err();
    match err {
        IndexError::AmbiguousReference { candidates, .. } => {
            assert_eq!(candidates, vec![b.locator.clone(), a.locator.clone()]);
        }
        other => panic!("expected ambiguous reference, got {other:?}"),
    }

    // A longer suffix disambiguates.
    let resolved =
        resolve_reference("Sales/Customer/Customer", &loc("/Stage/X/Y/Z"), &catalog).unwrap();
    assert_eq!(resolved, a.locator);
}

#[test]
fn malformed_expression_is_reported_with_referrer() {
    let catalog = EntityCatalog::new(std::iter::empty());
    let context = loc("/Stage/S/M/A");
    for expr in ["", "A//B", "a/b/c/d/e", "Sales/Customer/Customer/Extra"] {
        let err = resolve_reference(expr, &context, &catalog).unwrap_err();
        match err {
            IndexError::MalformedLocator { referrer, .. } => {
                assert_eq!(referrer, Some(context.clone()))
            }
            other => panic!("expected malformed locator for {expr:?}, got {other:?}"),
        }
    }
}

#[test]
fn resolve_entity_builds_edges_and_checks_mappings() {
    let raw = entity("/Raw/Sales/Customer/Customer", &["id", "name"], vec![]);
    let stage = entity(
        "/Stage/Sales/Customer/Customer",
        &["customer_id"],
        vec![ReferenceDecl::source(
            "/Raw/Sales/Customer/Customer",
            vec![
                MappingPair::new("customer_id", "id"),
                MappingPair::new("customer_id", "undeclared"),
            ],
        )],
    );
    let catalog = EntityCatalog::new([&raw, &stage]);

    let resolution = resolve_entity(&stage, &catalog);
    assert!(resolution.fatal.is_empty());
    assert_eq!(resolution.edges.len(), 1);
    assert_eq!(resolution.edges[0].to, raw.locator);
    assert_eq!(resolution.references[0].target, Some(raw.locator.clone()));

    assert_eq!(resolution.problems.len(), 1);
    match &resolution.problems[0] {
        IndexError::UnknownAttribute { attribute, target, .. } => {
            assert_eq!(attribute, "undeclared");
            assert_eq!(target, &raw.locator);
        }
        other => panic!("expected unknown attribute, got {other:?}"),
    }
}

#[test]
fn resolve_entity_reports_illegal_layer_reference() {
    let raw = entity("/Raw/Sales/Customer/Customer", &[], vec![]);
    let core = entity(
        "/Core/Sales/Customer/Customer",
        &[],
        vec![source("/Raw/Sales/Customer/Customer")],
    );
    let catalog = EntityCatalog::new([&raw, &core]);

    let resolution = resolve_entity(&core, &catalog);
    assert!(resolution.edges.is_empty());
    assert_eq!(resolution.fatal.len(), 1);
    assert!(matches!(
        resolution.fatal[0],
        IndexError::IllegalLayerReference {
            referrer_layer: Layer::Core,
            target_layer: Layer::Raw,
            ..
        }
    ));
    assert_eq!(resolution.references[0].target, None);
}

#[test]
fn raw_entity_may_not_declare_any_reference() {
    let stage = entity("/Stage/Sales/Customer/Customer", &[], vec![]);
    let raw = entity(
        "/Raw/Sales/Customer/Customer",
        &[],
        vec![source("/Stage/Sales/Customer/Customer"), source("/Stage/Sales/Customer/Nope")],
    );
    let catalog = EntityCatalog::new([&stage, &raw]);

    let resolution = resolve_entity(&raw, &catalog);
    assert!(resolution.problems.is_empty());
    assert!(resolution.edges.is_empty());
    assert_eq!(resolution.fatal.len(), 2);
    match &resolution.fatal[1] {
        IndexError::ReferenceNotAllowed {
            referrer_layer,
            reference,
            ..
        } => {
            assert_eq!(*referrer_layer, Layer::Raw);
            assert_eq!(reference, "/Stage/Sales/Customer/Nope");
        }
        other => panic!("expected a disallowed reference, got {other:?}"),
    }
    assert!(resolution.references.iter().all(|r| r.target.is_none()));
}

#[test]
fn resolve_entity_keeps_unresolved_references() {
    let stage = entity("/Stage/S/M/A", &[], vec![source("Missing")]);
    let catalog = EntityCatalog::new([&stage]);

    let resolution = resolve_entity(&stage, &catalog);
    assert_eq!(resolution.references.len(), 1);
    assert_eq!(resolution.references[0].target, None);
    assert!(matches!(
        resolution.problems[0],
        IndexError::UnresolvedReference { .. }
    ));
}

#[test]
fn duplicate_references_produce_one_edge_per_kind() {
    let stage = entity("/Stage/S/M/B", &[], vec![]);
    let mut core = entity("/Core/S/M/A", &[], vec![source("B"), source("/Stage/S/M/B")]);
    core.relationships
        .push(ReferenceDecl::relationship("B", CardinalityRole::ManyToOne, vec![]));
    let catalog = EntityCatalog::new([&stage, &core]);

    let resolution = resolve_entity(&core, &catalog);
    let kinds: Vec<EdgeKind> = resolution.edges.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EdgeKind::Source, EdgeKind::Relationship]);
    assert_eq!(resolution.references.len(), 3);
}

#[test]
fn could_match_over_approximates_by_suffix() {
    let locator = loc("/Core/Sales/Customer/Customer");
    assert!(could_match("Customer", &locator));
    assert!(could_match("Sales/Customer/Customer", &locator));
    assert!(could_match("core/Sales/Customer/Customer", &locator));
    assert!(!could_match("/Stage/Sales/Customer/Customer", &locator));
    assert!(!could_match("Orders", &locator));
    assert!(!could_match("", &locator));
}

#[test]
fn references_resolve_against_a_committed_snapshot() {
    use crate::domain::entities::IndexRecord;

    let record = |locator: &str| IndexRecord {
        locator: loc(locator),
        display_name: String::new(),
        description: None,
        path: SourcePath::from("x.json"),
        fingerprint: Fingerprint::from_bytes(b"x"),
        closure_fingerprint: Fingerprint::from_bytes(b"x"),
        attributes: Vec::new(),
        parameters: BTreeMap::new(),
        tags: BTreeSet::new(),
        references: Vec::new(),
        edges: Vec::new(),
        problems: Vec::new(),
    };
    let snapshot = Snapshot::from_records(vec![
        record("/Raw/Sales/Customer/Customer"),
        record("/Raw/Crm/Customer/Customer"),
        record("/Stage/Sales/Customer/Customer"),
    ]);
    let context = loc("/Stage/Sales/Customer/Customer");

    assert_eq!(
        resolve_reference("Sales/Customer/Customer", &context, &snapshot).unwrap(),
        loc("/Raw/Sales/Customer/Customer")
    );
    assert!(matches!(
        resolve_reference("Customer", &context, &snapshot),
        Err(IndexError::AmbiguousReference { .. })
    ));
}
