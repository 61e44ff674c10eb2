//! Property tests for definition fingerprints.

use proptest::prelude::*;
use serde_json::{json, Value};

use modeldex::domain::value_objects::Fingerprint;

fn tags() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z]{1,8}", 0..6)
}

fn attribute_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-z][a-z0-9_]{0,10}", 1..6)
        .prop_map(|names| names.into_iter().collect())
}

fn definition(name: &str, tags: &[String], attributes: &[String]) -> Value {
    let attributes: Vec<Value> = attributes
        .iter()
        .map(|a| json!({ "name": a, "dataType": { "type": "string", "nullable": true } }))
        .collect();
    json!({
        "type": "entity",
        "entity": {
            "name": name,
            "tags": tags,
            "attribute": attributes
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Whitespace and key order do not change the fingerprint.
    #[test]
    fn property_fingerprint_ignores_formatting(
        tags in tags(),
        attributes in attribute_names(),
    ) {
        let doc = definition("Customer", &tags, &attributes);
        let compact: Value = serde_json::from_str(&serde_json::to_string(&doc).unwrap()).unwrap();
        let pretty: Value =
            serde_json::from_str(&serde_json::to_string_pretty(&doc).unwrap()).unwrap();

        prop_assert_eq!(
            Fingerprint::from_definition(&compact),
            Fingerprint::from_definition(&pretty)
        );
    }

    /// PROPERTY: Tags are a set; their order does not change the fingerprint.
    #[test]
    fn property_fingerprint_ignores_tag_order(
        tags in tags(),
        attributes in attribute_names(),
    ) {
        let mut reversed = tags.clone();
        reversed.reverse();

        prop_assert_eq!(
            Fingerprint::from_definition(&definition("Customer", &tags, &attributes)),
            Fingerprint::from_definition(&definition("Customer", &reversed, &attributes))
        );
    }

    /// PROPERTY: Attribute order is meaningful.
    #[test]
    fn property_fingerprint_tracks_attribute_order(
        attributes in attribute_names().prop_filter("needs two attributes", |a| a.len() > 1),
    ) {
        let mut reversed = attributes.clone();
        reversed.reverse();

        prop_assert_ne!(
            Fingerprint::from_definition(&definition("Customer", &[], &attributes)),
            Fingerprint::from_definition(&definition("Customer", &[], &reversed))
        );
    }

    /// PROPERTY: Any change to a value changes the fingerprint.
    #[test]
    fn property_fingerprint_tracks_content(
        a in "[A-Za-z]{1,12}",
        b in "[A-Za-z]{1,12}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            Fingerprint::from_definition(&definition(&a, &[], &[])),
            Fingerprint::from_definition(&definition(&b, &[], &[]))
        );
    }
}
