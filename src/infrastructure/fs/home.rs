//! Home directory resolution with test isolation support.
//!
//! `dirs::home_dir()` ignores `HOME` on Windows, so tests set
//! `MODELDEX_TEST_HOME` instead.

use std::path::{Path, PathBuf};

/// Environment variable overriding the home directory.
pub const MODELDEX_TEST_HOME_VAR: &str = "MODELDEX_TEST_HOME";

pub fn modeldex_home_dir() -> Option<PathBuf> {
    std::env::var(MODELDEX_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// Expand a leading `~` to the home directory. Other paths are returned as is.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match modeldex_home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
