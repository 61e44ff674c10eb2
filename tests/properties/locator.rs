//! Property tests for locator parsing and suffix matching.

use proptest::prelude::*;

use modeldex::domain::services::could_match;
use modeldex::domain::value_objects::split_segments;
use modeldex::{Layer, Locator};

fn layer() -> impl Strategy<Value = Layer> {
    prop::sample::select(Layer::ALL.to_vec())
}

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z][A-Za-z0-9_]{0,15}").unwrap()
}

/// Token spellings accepted for a layer.
fn spelling(layer: Layer, variant: u8) -> String {
    match variant % 3 {
        0 => layer.token().to_string(),
        1 => layer.token().to_ascii_lowercase(),
        _ => layer.token().to_ascii_uppercase(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing arbitrary input never panics.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,128}") {
        let _ = Locator::parse(&s);
        let _ = split_segments(&s);
    }

    /// PROPERTY: Every accepted spelling parses to the canonical form, and
    /// the canonical form parses to itself.
    #[test]
    fn property_parse_yields_canonical_form(
        layer in layer(),
        product in segment(),
        module in segment(),
        name in segment(),
        variant in any::<u8>(),
        leading_slash in any::<bool>(),
    ) {
        let canonical = Locator::encode(layer, &product, &module, &name).unwrap();
        let written = format!(
            "{}{}/{}/{}/{}",
            if leading_slash { "/" } else { "" },
            spelling(layer, variant),
            product,
            module,
            name
        );

        let parsed = Locator::parse(&written).unwrap();
        prop_assert_eq!(&parsed, &canonical);
        prop_assert_eq!(parsed.as_str(), format!("/{}/{}/{}/{}", layer.token(), product, module, name));
        prop_assert_eq!(Locator::parse(parsed.as_str()).unwrap(), parsed);
    }

    /// PROPERTY: A locator matches every trailing slice of its own segments,
    /// and the matching agrees with `could_match` on the written form.
    #[test]
    fn property_locator_matches_its_own_suffixes(
        layer in layer(),
        product in segment(),
        module in segment(),
        name in segment(),
    ) {
        let locator = Locator::encode(layer, &product, &module, &name).unwrap();
        let segments = locator.segments();
        for start in 0..segments.len() {
            let suffix = &segments[start..];
            prop_assert!(locator.ends_with(suffix));
            prop_assert!(could_match(&suffix.join("/"), &locator));
        }
        prop_assert!(!locator.ends_with(&[]));
    }

    /// PROPERTY: Segment spelling is kept in the identity, and matching
    /// ignores it.
    #[test]
    fn property_matching_ignores_segment_case(
        layer in layer(),
        product in "[a-z]{1,8}",
        name in "[a-z]{1,8}",
    ) {
        let lower = Locator::encode(layer, &product, "M", &name).unwrap();
        let upper = Locator::encode(layer, &product.to_uppercase(), "M", &name.to_uppercase()).unwrap();
        prop_assert_ne!(&lower, &upper);
        prop_assert!(upper.ends_with(&[product.as_str(), "m", name.as_str()]));
        prop_assert!(upper.matches(&lower));
        prop_assert!(could_match(lower.as_str(), &upper));
    }
}
