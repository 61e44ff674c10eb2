//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `discovery` - Walks layer roots for definition files
//! - `loader/` - Entity loading and structural checks (`EntitySource`)
//! - `repositories/` - Persisted index (`IndexRepository`)
//! - `fs/` - Atomic writes, locking, home directory

pub mod discovery;
pub mod fs;
pub mod loader;
pub mod repositories;

// Re-export for convenience
pub use discovery::{discover, Discovery, EntityFile};
pub use loader::{load_entity, load_files, FsEntitySource};
pub use repositories::JsonIndexRepository;
