//! Layering contracts (LAYER-001 through LAYER-003)
//!
//! Raw declares no references at all, Stage reads Raw, Core reads Stage and Core,
//! Curated reads Core and Curated.

use modeldex::domain::services::may_reference;
use modeldex::{Layer, ModeldexError};

use crate::common::*;

/// Attempt to commit a solution whose only cross-entity edge is `from -> to`.
fn edge_outcome(from: &str, to: &str) -> Result<(), String> {
    let target = loc(to);
    let solution = TestSolution::with_entities([
        (to, keyed(target.name()).build()),
        (from, keyed(loc(from).name()).source(to, &[("id", "id")]).build()),
    ]);

    match solution.coordinator().validate_index(false) {
        Ok(_) => Ok(()),
        Err(ModeldexError::ValidationFailed { report }) => Err(report
            .fatal
            .as_ref()
            .map(|f| f.kind.clone())
            .unwrap_or_default()),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

/// CONTRACT LAYER-001: every committed edge respects the layering table
#[test]
fn contract_committed_edges_respect_layering() {
    let solution = TestSolution::with_entities(customer_chain());
    let mut coordinator = solution.coordinator();
    coordinator.validate_index(false).unwrap();

    let records = coordinator.all_entities(None).unwrap();
    let mut edges = 0;
    for record in records {
        for edge in &record.edges {
            edges += 1;
            assert!(
                may_reference(edge.from.layer(), edge.to.layer()),
                "committed edge {} -> {} breaks layering",
                edge.from,
                edge.to
            );
        }
    }
    assert_eq!(edges, 3);
}

/// CONTRACT LAYER-002: an illegal layer reference aborts the commit
mod illegal_references {
    use super::*;

    #[test]
    fn contract_core_may_not_read_raw() {
        assert_eq!(
            edge_outcome("/Core/Sales/Customer/Shortcut", "/Raw/Sales/Customer/Customer"),
            Err("IllegalLayerReferenceError".to_string())
        );
    }

    #[test]
    fn contract_raw_references_nothing() {
        assert_eq!(
            edge_outcome("/Raw/Sales/Customer/Copy", "/Raw/Sales/Customer/Customer"),
            Err("IllegalLayerReferenceError".to_string())
        );
    }

    #[test]
    fn contract_raw_reference_is_fatal_even_when_unresolved() {
        let solution = TestSolution::with_entities([(
            "/Raw/Sales/Customer/Customer",
            keyed("Customer")
                .source("/Stage/Sales/Customer/Nope", &[("id", "id")])
                .build(),
        )]);

        match solution.coordinator().validate_index(false) {
            Err(ModeldexError::ValidationFailed { report }) => {
                let fatal = report.fatal.as_ref().expect("fatal diagnostic");
                assert_eq!(fatal.kind, "IllegalLayerReferenceError");
                assert!(fatal.message.contains("/Stage/Sales/Customer/Nope"), "{}", fatal.message);
                assert!(!report.committed);
            }
            other => panic!("expected a failed validation, got {other:?}"),
        }
        assert!(!solution.index_path().exists());
    }

    #[test]
    fn contract_stage_may_not_read_stage() {
        assert_eq!(
            edge_outcome("/Stage/Sales/Customer/Copy", "/Stage/Sales/Customer/Customer"),
            Err("IllegalLayerReferenceError".to_string())
        );
    }

    #[test]
    fn contract_failed_commit_writes_nothing() {
        let solution = TestSolution::with_entities([
            ("/Raw/Sales/Customer/Customer", keyed("Customer").build()),
            (
                "/Curated/Sales/Customer/Mart",
                keyed("Mart")
                    .source("/Raw/Sales/Customer/Customer", &[("id", "id")])
                    .build(),
            ),
        ]);
        assert!(solution.coordinator().validate_index(false).is_err());
        assert!(!solution.index_path().exists());
    }
}

/// CONTRACT LAYER-003: legal same-layer and downward edges commit
mod legal_references {
    use super::*;

    #[test]
    fn contract_allowed_pairs_commit() {
        let allowed = [
            ("/Stage/S/M/B", "/Raw/S/M/A"),
            ("/Core/S/M/B", "/Stage/S/M/A"),
            ("/Core/S/M/B", "/Core/S/M/A"),
            ("/Curated/S/M/B", "/Core/S/M/A"),
            ("/Curated/S/M/B", "/Curated/S/M/A"),
        ];
        for (from, to) in allowed {
            assert_eq!(edge_outcome(from, to), Ok(()), "{from} -> {to}");
        }
    }

    #[test]
    fn contract_layering_table_is_exhaustive() {
        let legal: Vec<(Layer, Layer)> = Layer::ALL
            .iter()
            .flat_map(|from| Layer::ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| may_reference(*from, *to))
            .collect();
        assert_eq!(
            legal,
            vec![
                (Layer::Stage, Layer::Raw),
                (Layer::Core, Layer::Stage),
                (Layer::Core, Layer::Core),
                (Layer::Curated, Layer::Core),
                (Layer::Curated, Layer::Curated),
            ]
        );
    }
}
