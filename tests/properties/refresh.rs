//! Property tests for incremental refresh.
//!
//! After any sequence of edits, removals and restorations, the index written
//! by a chain of refreshes is byte-identical to a full rebuild of the final
//! tree, and validating again changes nothing.

use proptest::prelude::*;
use serde_json::Value;

use crate::common::*;

/// Six entities, two per lower layer and one in each upper layer.
const LOCATORS: [&str; 6] = [
    "/Raw/P/M/E0",
    "/Raw/P/M/E1",
    "/Stage/P/M/E2",
    "/Stage/P/M/E3",
    "/Core/P/M/E4",
    "/Curated/P/M/E5",
];

fn base_doc(i: usize, description: Option<&str>) -> Value {
    let name = format!("E{}", i);
    let mut doc = keyed(&name);
    if let Some(text) = description {
        doc = doc.description(text);
    }
    doc = match i {
        2 => doc.source("/Raw/P/M/E0", &[("id", "id")]),
        3 => doc.source("E1", &[("id", "id")]),
        4 => doc
            .source("/Stage/P/M/E2", &[("id", "id")])
            .relationship("M/E3", "manyToOne", &[("id", "id")]),
        5 => doc.source("/Core/P/M/E4", &[("id", "id")]),
        _ => doc,
    };
    doc.build()
}

#[derive(Debug, Clone)]
enum Edit {
    Describe(usize, String),
    Remove(usize),
    Restore(usize),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..LOCATORS.len(), "[a-z ]{0,12}").prop_map(|(i, s)| Edit::Describe(i, s)),
        (0..LOCATORS.len()).prop_map(Edit::Remove),
        (0..LOCATORS.len()).prop_map(Edit::Restore),
    ]
}

fn apply(solution: &TestSolution, edit: &Edit) {
    match edit {
        Edit::Describe(i, text) => solution.write_entity(LOCATORS[*i], &base_doc(*i, Some(text))),
        Edit::Remove(i) => {
            if solution.entity_path(LOCATORS[*i]).exists() {
                solution.remove_entity(LOCATORS[*i]);
            }
        }
        Edit::Restore(i) => solution.write_entity(LOCATORS[*i], &base_doc(*i, None)),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 24,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Refreshing after each edit ends where a full rebuild ends.
    #[test]
    fn property_refresh_equals_full_rebuild(edits in proptest::collection::vec(edit(), 1..8)) {
        let solution = TestSolution::with_entities(
            LOCATORS.iter().enumerate().map(|(i, l)| (*l, base_doc(i, None))),
        );
        let mut coordinator = solution.coordinator();
        coordinator.validate_index(false).unwrap();

        for edit in &edits {
            apply(&solution, edit);
            let report = coordinator.validate_index(false).unwrap();
            prop_assert!(report.committed);
        }
        let refreshed = solution.read_index();

        let report = solution.coordinator().validate_index(true).unwrap();
        prop_assert!(report.stale.is_empty(), "full rebuild found stale entities: {:?}", report.stale);
        prop_assert_eq!(solution.read_index(), refreshed);
    }

    /// PROPERTY: Validating an unchanged tree is idempotent.
    #[test]
    fn property_validation_is_idempotent(edits in proptest::collection::vec(edit(), 0..4)) {
        let solution = TestSolution::with_entities(
            LOCATORS.iter().enumerate().map(|(i, l)| (*l, base_doc(i, None))),
        );
        for edit in &edits {
            apply(&solution, edit);
        }

        let mut coordinator = solution.coordinator();
        coordinator.validate_index(false).unwrap();
        let first = solution.read_index();

        let report = coordinator.validate_index(false).unwrap();
        prop_assert!(report.revalidated.is_empty());
        prop_assert!(report.stale.is_empty());
        prop_assert_eq!(solution.read_index(), first);
    }
}
