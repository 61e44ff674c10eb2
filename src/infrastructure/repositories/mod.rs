//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod index;

pub use index::{parse_snapshot, render_snapshot, JsonIndexRepository};
