//! TemplateRenderer port - hands validated entities to a generator
//!
//! Renderers receive entities in dependency order, each with the records it
//! depends on, after the index has been committed.

use crate::domain::entities::IndexRecord;

/// One entity to render.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub record: &'a IndexRecord,
    /// Direct dependencies, in locator order
    pub dependencies: Vec<&'a IndexRecord>,
    /// Whether the closure changed since the entity was last rendered
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to render {locator}: {message}")]
pub struct RenderError {
    pub locator: String,
    pub message: String,
}

pub trait TemplateRenderer {
    fn render(&mut self, request: &RenderRequest<'_>) -> Result<(), RenderError>;
}
