//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod entity_source;
pub mod index_query;
pub mod index_repository;
pub mod template_renderer;

pub use entity_source::{EntitySource, LoadedModel};
pub use index_query::IndexQuery;
pub use index_repository::{IndexRepository, IndexStoreError, IndexStoreResult};
pub use template_renderer::{RenderError, RenderRequest, TemplateRenderer};
