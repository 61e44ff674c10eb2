//! IndexRepository port - abstraction for index persistence
//!
//! The coordinator loads the previously committed snapshot and commits new
//! ones through this trait without knowing the on-disk format. The
//! generation record lives next to the index and is written separately.

use std::path::PathBuf;

use crate::domain::entities::{GenerationRecord, Snapshot};

/// Result type for index persistence
pub type IndexStoreResult<T> = Result<T, IndexStoreError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexStoreError {
    #[error("failed to read index {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to write index {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("index {} is not valid: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("index {} has format version {found}, expected {expected}; run a full validation to rebuild it", .path.display())]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("failed to lock index {}: {message}", .path.display())]
    Lock { path: PathBuf, message: String },

    #[error("no index at {}; run `modeldex validate-index` first", .path.display())]
    Missing { path: PathBuf },
}

impl IndexStoreError {
    /// Whether a fresh full rebuild can replace the stored index.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IndexStoreError::Parse { .. } | IndexStoreError::VersionMismatch { .. }
        )
    }
}

/// Persistence for the index snapshot.
pub trait IndexRepository {
    /// Load the committed snapshot; `Ok(None)` when nothing was committed yet.
    fn load(&self) -> IndexStoreResult<Option<Snapshot>>;

    /// Replace the committed snapshot. Either the whole snapshot is written
    /// or the previous one is left untouched.
    fn save(&self, snapshot: &Snapshot) -> IndexStoreResult<()>;

    /// Location of the stored index, for reporting.
    fn location(&self) -> PathBuf;

    /// Load the generation record; empty when nothing was rendered yet.
    fn load_generation(&self) -> IndexStoreResult<GenerationRecord>;

    /// Replace the generation record, with the same all-or-nothing
    /// guarantee as [`IndexRepository::save`].
    fn save_generation(&self, record: &GenerationRecord) -> IndexStoreResult<()>;
}
