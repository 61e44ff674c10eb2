//! Incremental refresh contracts (REFRESH-001 through REFRESH-004)
//!
//! A refresh must be indistinguishable from a full rebuild, and must only
//! revalidate what a change can reach.

use modeldex::application::IndexMode;

use crate::common::*;

/// CONTRACT REFRESH-001: refresh and full rebuild write identical indexes
#[test]
fn contract_refresh_equals_full_rebuild() {
    let solution = TestSolution::with_entities(customer_chain());
    let mut coordinator = solution.coordinator();
    coordinator.validate_index(false).unwrap();

    solution.write_entity(
        "/Stage/Sales/Customer/Customer",
        &keyed("Customer")
            .attribute("name", "string")
            .description("staged customers")
            .source("/Raw/Sales/Customer/Customer", &[("id", "id")])
            .build(),
    );
    solution.write_entity("/Core/Finance/Ledger/Account", &keyed("Account").build());

    let report = coordinator.validate_index(false).unwrap();
    assert_eq!(report.mode, IndexMode::Incremental);
    let refreshed = solution.read_index();

    std::fs::remove_file(solution.index_path()).unwrap();
    let report = solution.coordinator().validate_index(false).unwrap();
    assert_eq!(report.mode, IndexMode::Full);
    assert_eq!(solution.read_index(), refreshed);
}

/// CONTRACT REFRESH-002: deleting a file revalidates its dependents only
#[test]
fn contract_deletion_revalidates_dependents_only() {
    let solution = TestSolution::with_entities(customer_chain());
    let mut coordinator = solution.coordinator();
    coordinator.validate_index(false).unwrap();
    let raw_before = coordinator
        .lookup(&loc("/Raw/Sales/Customer/Customer"))
        .unwrap()
        .closure_fingerprint
        .clone();

    solution.remove_entity("/Stage/Sales/Customer/Customer");
    let report = coordinator.validate_index(false).unwrap();

    assert_eq!(report.removed, vec![loc("/Stage/Sales/Customer/Customer")]);
    assert!(report.revalidated.contains(&loc("/Core/Sales/Customer/Customer")));
    assert!(report
        .revalidated
        .contains(&loc("/Curated/Sales/Customer/CustomerMart")));
    assert!(report.reused.contains(&loc("/Raw/Sales/Customer/Customer")));
    assert!(report.reused.contains(&loc("/Raw/Finance/Ledger/Account")));

    // Core's source is gone: reported, still committed
    assert!(report.committed);
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.kind == "UnresolvedReferenceError"));

    let raw_after = &coordinator
        .lookup(&loc("/Raw/Sales/Customer/Customer"))
        .unwrap()
        .closure_fingerprint;
    assert_eq!(raw_after, &raw_before);
}

/// CONTRACT REFRESH-003: a new candidate makes a previously unique
/// reference ambiguous
#[test]
fn contract_new_entity_reaches_partial_references() {
    let solution = TestSolution::with_entities([
        ("/Core/Sales/Customer/Customer", keyed("Customer").build()),
        (
            "/Curated/Sales/Customer/Mart",
            keyed("Mart")
                .source("Customer/Customer", &[("id", "id")])
                .build(),
        ),
    ]);
    let mut coordinator = solution.coordinator();
    let report = coordinator.validate_index(false).unwrap();
    assert!(report.diagnostics.is_empty());

    solution.write_entity("/Curated/Sales/Customer/Customer", &keyed("Customer").build());
    let report = coordinator.validate_index(false).unwrap();

    assert!(report.revalidated.contains(&loc("/Curated/Sales/Customer/Mart")));
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.kind == "AmbiguousReferenceError"));
}

/// CONTRACT REFRESH-004: an unchanged tree rewrites nothing and reports
/// nothing stale
#[test]
fn contract_unchanged_tree_is_a_no_op() {
    let solution = TestSolution::with_entities(customer_chain());
    solution.coordinator().validate_index(false).unwrap();
    let before = solution.read_index();

    let report = solution.coordinator().validate_index(false).unwrap();
    assert_eq!(report.mode, IndexMode::Incremental);
    assert!(report.stale.is_empty());
    assert!(report.revalidated.is_empty());
    assert_eq!(report.reused.len(), 5);
    assert_eq!(solution.read_index(), before);
}
