//! Value Objects
//!
//! Immutable types without identity, compared by value.

mod fingerprint;
mod ignore_patterns;
mod layer;
mod locator;
mod path;

pub use fingerprint::{canonical_json, normalized_definition, Fingerprint};
pub use ignore_patterns::{IgnoreError, IgnorePatterns, DEFAULT_IGNORE_FILE};
pub use layer::Layer;
pub use locator::{split_segments, Locator, LocatorError, SEGMENT_COUNT, SEPARATOR};
pub use path::SourcePath;
