#![no_main]

use libfuzzer_sys::fuzz_target;
use modeldex::domain::value_objects::split_segments;
use modeldex::Locator;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = split_segments(input);

        // Whatever parses must come back unchanged from its canonical form
        if let Ok(locator) = Locator::parse(input) {
            let again = Locator::parse(locator.as_str()).expect("canonical form parses");
            assert_eq!(again, locator);
        }
    }
});
