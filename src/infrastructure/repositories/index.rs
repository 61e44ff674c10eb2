//! JSON Index Repository
//!
//! Implements the IndexRepository port as a single pretty-printed JSON file.
//! Output is deterministic: object keys are sorted, there are no timestamps
//! and paths are relative, so re-serializing a snapshot is byte-identical.
//!
//! The generation record is a second file beside the index
//! (`index.json` -> `index.generated.json`), written under the same lock.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::entities::{GenerationRecord, Snapshot, GENERATION_VERSION, SNAPSHOT_VERSION};
use crate::domain::ports::{IndexRepository, IndexStoreError, IndexStoreResult};
use crate::infrastructure::fs::{write_atomic, FileLock};

#[derive(Debug, Clone)]
pub struct JsonIndexRepository {
    path: PathBuf,
}

impl JsonIndexRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the generation record is kept.
    pub fn generation_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index".to_string());
        self.path.with_file_name(format!("{}.generated.json", stem))
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn write_locked(&self, path: &Path, content: &str) -> IndexStoreResult<()> {
        let lock_path = self.lock_path();
        let _lock = FileLock::acquire(&lock_path).map_err(|e| IndexStoreError::Lock {
            path: lock_path.clone(),
            message: e.to_string(),
        })?;

        write_atomic(path, content.as_bytes()).map_err(|e| IndexStoreError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn parse_error(&self, message: impl ToString) -> IndexStoreError {
        IndexStoreError::Parse {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

/// Serialize a snapshot to its on-disk form.
pub fn render_snapshot(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    // Going through `Value` sorts every object's keys.
    let value = serde_json::to_value(snapshot)?;
    let mut out = serde_json::to_string_pretty(&value)?;
    out.push('\n');
    Ok(out)
}

/// Parse the on-disk form, checking the format version first.
pub fn parse_snapshot(content: &str, path: &Path) -> IndexStoreResult<Snapshot> {
    let parse_error = |message: String| IndexStoreError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| parse_error("missing format version".to_string()))?;
    if version != u64::from(SNAPSHOT_VERSION) {
        return Err(IndexStoreError::VersionMismatch {
            path: path.to_path_buf(),
            found: u32::try_from(version).unwrap_or(u32::MAX),
            expected: SNAPSHOT_VERSION,
        });
    }

    let snapshot: Snapshot =
        serde_json::from_value(value).map_err(|e| parse_error(e.to_string()))?;
    if let Some((key, record)) = snapshot
        .entities
        .iter()
        .find(|(key, record)| **key != record.locator)
    {
        return Err(parse_error(format!(
            "entry {} holds record for {}",
            key, record.locator
        )));
    }
    Ok(snapshot)
}

impl IndexRepository for JsonIndexRepository {
    fn load(&self) -> IndexStoreResult<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| IndexStoreError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        parse_snapshot(&content, &self.path).map(Some)
    }

    fn save(&self, snapshot: &Snapshot) -> IndexStoreResult<()> {
        let content = render_snapshot(snapshot).map_err(|e| self.parse_error(e))?;
        self.write_locked(&self.path, &content)?;

        tracing::debug!(path = %self.path.display(), entities = snapshot.len(), "index committed");
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }

    fn load_generation(&self) -> IndexStoreResult<GenerationRecord> {
        let path = self.generation_path();
        if !path.exists() {
            return Ok(GenerationRecord::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| IndexStoreError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let record: GenerationRecord =
            serde_json::from_str(&content).map_err(|e| IndexStoreError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
        if record.version != GENERATION_VERSION {
            return Err(IndexStoreError::VersionMismatch {
                path,
                found: record.version,
                expected: GENERATION_VERSION,
            });
        }
        Ok(record)
    }

    fn save_generation(&self, record: &GenerationRecord) -> IndexStoreResult<()> {
        let path = self.generation_path();
        let mut content =
            serde_json::to_string_pretty(record).map_err(|e| IndexStoreError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
        content.push('\n');
        self.write_locked(&path, &content)?;

        tracing::debug!(path = %path.display(), entities = record.len(), "generation record written");
        Ok(())
    }
}
