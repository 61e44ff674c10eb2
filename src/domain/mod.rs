//! Domain Layer
//!
//! Entity model, locator rules, resolution and graph logic, without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Entity, index snapshot, diagnostics
//! - `value_objects/` - Layer, Locator, Fingerprint, SourcePath, ignore patterns
//! - `services/` - Reference resolution and the dependency graph
//! - `ports/` - Interface definitions for infrastructure and consumers
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
