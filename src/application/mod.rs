//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ModelCoordinator` - Validate and commit the index, answer queries
//! - `refresh_generate` - Validate, then render stale entities in order
//!
//! ## Services
//!
//! - `index_store` - Build full or incremental snapshots from a loaded model

pub mod coordinator;
pub mod generate;
pub mod index_store;
pub mod report;

pub use coordinator::{ModelCoordinator, RunCache};
pub use generate::{refresh_generate, GenerateOutcome, PlanRenderer, PlannedArtifact};
pub use index_store::{full_rebuild, incremental_refresh, BuildFailure, BuildOutput};
pub use report::{IndexMode, ValidationReport};
