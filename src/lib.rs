//! modeldex - entity index and locator resolution engine
//!
//! modeldex loads layered data-warehouse entity definitions (Raw, Stage,
//! Core, Curated), resolves the locator references between them, validates
//! the layering rules and commits a persisted index that code generators
//! query instead of re-reading the model tree.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    refresh_generate, IndexMode, ModelCoordinator, PlanRenderer, RunCache, ValidationReport,
};
pub use config::{load_solution, ConfigWarning, SolutionConfig};
pub use domain::entities::{Diagnostic, Entity, IndexRecord, Snapshot};
pub use domain::ports::IndexQuery;
pub use domain::value_objects::{Layer, Locator};
pub use error::{IndexError, ModeldexError, ModeldexResult};
