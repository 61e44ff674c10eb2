#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use modeldex::infrastructure::repositories::{parse_snapshot, render_snapshot};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let path = Path::new("index.json");
        if let Ok(snapshot) = parse_snapshot(content, path) {
            // An accepted index re-renders to something that loads back
            let rendered = render_snapshot(&snapshot).expect("render");
            let again = parse_snapshot(&rendered, path).expect("reparse");
            assert_eq!(again.len(), snapshot.len());
        }
    }
});
