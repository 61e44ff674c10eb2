//! Solution configuration
//!
//! Resolution order:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (MODELDEX_*)
//! 3. Solution descriptor (`solution.toml`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    find_descriptor, load_solution, load_with_warnings, resolve, with_env_overrides,
};
pub use types::{
    ConfigError, ConfigWarning, DiscoverySection, LayerRoots, LayersSection, SolutionConfig,
    SolutionFile, INDEX_FILE, MAX_AUTO_WORKERS, SOLUTION_FILE,
};
