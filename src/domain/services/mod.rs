//! Domain Services
//!
//! Pure logic over domain entities, with no I/O.

pub mod dependency_graph;
pub mod reference_resolver;

pub use dependency_graph::DependencyGraph;
pub use reference_resolver::{
    allowed_targets, could_match, may_reference, resolve_entity, resolve_reference,
    EntityCatalog, EntityResolution, KnownLocators,
};
