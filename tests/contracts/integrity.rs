//! Integrity contracts (INTEGRITY-001 through INTEGRITY-004)
//!
//! A committed index has unique locators, no cycles, and every schema
//! violation of a file is reported at once.

use modeldex::error::Severity;
use modeldex::{ModeldexError, ValidationReport};

use crate::common::*;

fn failed_report(solution: &TestSolution) -> ValidationReport {
    match solution.coordinator().validate_index(false) {
        Err(ModeldexError::ValidationFailed { report }) => *report,
        Ok(report) => panic!("expected a failed validation, committed {report:?}"),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

/// CONTRACT INTEGRITY-001: a cycle aborts the commit and names every member
#[test]
fn contract_cycle_is_fatal_and_named() {
    let solution = TestSolution::with_entities([
        (
            "/Core/Sales/Customer/A",
            keyed("A").source("/Core/Sales/Customer/B", &[("id", "id")]).build(),
        ),
        (
            "/Core/Sales/Customer/B",
            keyed("B").source("/Core/Sales/Customer/A", &[("id", "id")]).build(),
        ),
    ]);

    let report = failed_report(&solution);
    let fatal = report.fatal.expect("fatal diagnostic");
    assert_eq!(fatal.kind, "CircularDependencyError");
    assert_eq!(
        fatal.locators,
        vec![loc("/Core/Sales/Customer/A"), loc("/Core/Sales/Customer/B")]
    );
    assert!(!report.committed);
    assert!(!solution.index_path().exists());
}

/// CONTRACT INTEGRITY-002: two files claiming one locator abort the commit
#[test]
fn contract_duplicate_locator_is_fatal() {
    let solution = TestSolution::new();
    solution.write_entity("/Raw/Sales/Customer/Customer", &keyed("Customer").build());
    // Different file name, same entity name
    let copy = solution.path("Raw/Sales/Customer/CustomerCopy.json");
    std::fs::write(
        &copy,
        serde_json::to_string(&keyed("Customer").build()).unwrap(),
    )
    .unwrap();

    let report = failed_report(&solution);
    let fatal = report.fatal.expect("fatal diagnostic");
    assert_eq!(fatal.kind, "DuplicateLocatorError");
    assert_eq!(fatal.locators, vec![loc("/Raw/Sales/Customer/Customer")]);
}

/// CONTRACT INTEGRITY-003: unknown mapped attributes are errors, not fatal
#[test]
fn contract_unknown_attribute_is_reported() {
    let solution = TestSolution::with_entities([
        ("/Raw/Sales/Customer/Customer", keyed("Customer").build()),
        (
            "/Stage/Sales/Customer/Customer",
            keyed("Customer")
                .attribute("email", "string")
                .source(
                    "/Raw/Sales/Customer/Customer",
                    &[("id", "id"), ("email", "email_address")],
                )
                .build(),
        ),
    ]);
    let mut coordinator = solution.coordinator();

    let report = coordinator.validate_index(false).unwrap();
    assert!(report.committed);
    assert_eq!(report.exit_code(false), 0);
    assert_eq!(report.exit_code(true), 1);

    let unknown: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.kind == "UnknownAttributeError")
        .collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].severity, Severity::Error);
    assert!(unknown[0].message.contains("email_address"));

    // The edge is kept so dependents still see the relationship
    let stage = coordinator
        .lookup(&loc("/Stage/Sales/Customer/Customer"))
        .unwrap();
    assert_eq!(stage.edges.len(), 1);
    assert!(!stage.is_valid());
}

/// CONTRACT INTEGRITY-004: a schema failure lists every violation and
/// excludes only that file
#[test]
fn contract_schema_violations_are_collected() {
    let solution = TestSolution::with_entities(customer_chain());
    solution.write_raw(
        "/Raw/Sales/Customer/Broken",
        r#"{
  "type": "entity",
  "entity": {
    "name": "Broken",
    "attribute": [
      { "name": "id" },
      { "name": "id", "dataType": { "type": "int" } }
    ]
  },
  "relationships": [ { "locator": "Customer", "role": "sideways" } ]
}"#,
    );
    let mut coordinator = solution.coordinator();

    let report = coordinator.validate_index(false).unwrap();
    assert!(report.committed);
    assert_eq!(report.entity_count(), 5);

    let schema: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.kind == "SchemaValidationError")
        .collect();
    assert_eq!(schema.len(), 1);
    let message = &schema[0].message;
    assert!(message.contains("dataType"), "{message}");
    assert!(message.contains("duplicate attribute"), "{message}");
    assert!(message.contains("sideways"), "{message}");
    assert!(schema[0].file.is_some());

    assert!(coordinator
        .lookup(&loc("/Raw/Sales/Customer/Broken"))
        .is_err());
}
