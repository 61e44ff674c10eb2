#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use modeldex::config::{resolve, SolutionFile};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Descriptor parsing and path resolution should never panic
        if let Ok(file) = toml::from_str::<SolutionFile>(content) {
            let _ = resolve(file, Path::new("/fuzz/solution"));
        }
    }
});
