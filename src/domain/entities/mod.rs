//! Domain Entities
//!
//! - `Entity` - A loaded entity definition
//! - `Snapshot` - The index: one `IndexRecord` per entity
//! - `Diagnostic` - A reportable error
//! - `GenerationRecord` - What was last rendered, per entity

mod diagnostic;
mod entity;
mod generation;
mod snapshot;

pub use diagnostic::Diagnostic;
pub use entity::{
    Attribute, CardinalityRole, EdgeKind, Entity, MappingPair, ParameterValue, ReferenceDecl,
};
pub use generation::{GenerationRecord, GENERATION_VERSION};
pub use snapshot::{DependencyEdge, IndexRecord, ResolvedReference, Snapshot, SNAPSHOT_VERSION};
