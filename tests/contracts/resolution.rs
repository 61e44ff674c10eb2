//! Resolution contracts (RESOLVE-001 through RESOLVE-006)

use modeldex::error::Severity;
use modeldex::{IndexError, ModeldexError};

use crate::common::*;

fn problems_of<'a>(records: &'a [&modeldex::IndexRecord], locator: &str) -> Vec<&'a str> {
    records
        .iter()
        .find(|r| r.locator == loc(locator))
        .map(|r| r.problems.iter().map(|p| p.kind.as_str()).collect())
        .unwrap_or_default()
}

/// CONTRACT RESOLVE-001: a fully qualified reference matches exactly
#[test]
fn contract_fully_qualified_reference_is_exact() {
    let solution = TestSolution::with_entities(customer_chain());
    let mut coordinator = solution.coordinator();
    coordinator.validate_index(false).unwrap();

    let context = loc("/Curated/Sales/Customer/CustomerMart");
    assert_eq!(
        coordinator
            .resolve("/Core/Sales/Customer/Customer", &context)
            .unwrap(),
        loc("/Core/Sales/Customer/Customer")
    );

    // Exact matches ignore the context layer filter; layering is checked separately
    assert_eq!(
        coordinator
            .resolve("/Raw/Sales/Customer/Customer", &context)
            .unwrap(),
        loc("/Raw/Sales/Customer/Customer")
    );

    let err = coordinator
        .resolve("/Core/Sales/Customer/Missing", &context)
        .unwrap_err();
    assert!(matches!(
        err,
        ModeldexError::Index(IndexError::UnresolvedReference { .. })
    ));
}

/// CONTRACT RESOLVE-002: partial references never match a higher layer
#[test]
fn contract_partial_reference_looks_down_only() {
    let solution = TestSolution::with_entities(customer_chain());
    let mut coordinator = solution.coordinator();
    coordinator.validate_index(false).unwrap();

    // From Stage, only the Raw Customer is visible (Stage itself is excluded)
    let stage = loc("/Stage/Sales/Customer/Customer");
    assert_eq!(
        coordinator.resolve("Customer", &stage).unwrap(),
        loc("/Raw/Sales/Customer/Customer")
    );

    // From Raw there is nothing at or below the layer except the context itself
    let raw = loc("/Raw/Sales/Customer/Customer");
    assert!(coordinator.resolve("Sales/Customer/Customer", &raw).is_err());
}

/// CONTRACT RESOLVE-003: more than one candidate is ambiguous, never a guess
#[test]
fn contract_ambiguous_reference_lists_candidates() {
    let solution = TestSolution::with_entities(customer_chain());
    let mut coordinator = solution.coordinator();
    coordinator.validate_index(false).unwrap();

    let mart = loc("/Curated/Sales/Customer/CustomerMart");
    match coordinator.resolve("Customer", &mart).unwrap_err() {
        ModeldexError::Index(IndexError::AmbiguousReference { candidates, .. }) => {
            assert_eq!(
                candidates,
                vec![
                    loc("/Core/Sales/Customer/Customer"),
                    loc("/Raw/Sales/Customer/Customer"),
                    loc("/Stage/Sales/Customer/Customer"),
                ]
            );
        }
        other => panic!("expected ambiguity, got {other}"),
    }
}

/// CONTRACT RESOLVE-004: unresolved and ambiguous references are reported,
/// not fatal
#[test]
fn contract_reference_problems_do_not_block_commit() {
    let mut entities = customer_chain();
    entities.push((
        "/Core/Sales/Orders/Order",
        keyed("Order")
            .relationship("Customer", "manyToOne", &[("id", "id")])
            .source("/Stage/Sales/Orders/Missing", &[("id", "id")])
            .build(),
    ));
    let solution = TestSolution::with_entities(entities);
    let mut coordinator = solution.coordinator();

    let report = coordinator.validate_index(false).unwrap();
    assert!(report.committed);
    assert_eq!(report.error_count(), 2);
    assert!(report
        .diagnostics
        .iter()
        .all(|d| d.severity == Severity::Error));

    let records = coordinator.all_entities(None).unwrap();
    let mut problems = problems_of(&records, "/Core/Sales/Orders/Order");
    problems.sort();
    assert_eq!(
        problems,
        vec!["AmbiguousReferenceError", "UnresolvedReferenceError"]
    );
}

/// CONTRACT RESOLVE-005: external sources are never resolved
#[test]
fn contract_external_sources_are_not_references() {
    let solution = TestSolution::with_entities([(
        "/Raw/Sales/Customer/Customer",
        keyed("Customer")
            .external_source("erp.dbo.customers")
            .build(),
    )]);
    let mut coordinator = solution.coordinator();

    let report = coordinator.validate_index(false).unwrap();
    assert!(report.diagnostics.is_empty());
    let record = coordinator
        .lookup(&loc("/Raw/Sales/Customer/Customer"))
        .unwrap();
    assert!(record.references.is_empty());
    assert!(record.edges.is_empty());
}

/// CONTRACT RESOLVE-006: references match locators ignoring case; the
/// committed edge points at the entity as it is spelled on disk
#[test]
fn contract_references_ignore_case() {
    let solution = TestSolution::with_entities([
        (
            "/Raw/Sales/Customer/Customer",
            keyed("Customer").attribute("name", "string").build(),
        ),
        (
            "/Stage/Sales/Customer/Customer",
            keyed("Customer")
                .source("/raw/sales/customer/customer", &[("id", "id")])
                .relationship("sales/CUSTOMER/customer", "manyToOne", &[("id", "id")])
                .build(),
        ),
    ]);
    let mut coordinator = solution.coordinator();

    let report = coordinator.validate_index(false).unwrap();
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

    let record = coordinator
        .lookup(&loc("/Stage/Sales/Customer/Customer"))
        .unwrap();
    assert!(record
        .edges
        .iter()
        .all(|e| e.to.as_str() == "/Raw/Sales/Customer/Customer"));
    assert_eq!(record.edges.len(), 2);
}
