//! Parallel loading of discovered files.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::domain::entities::Entity;
use crate::error::IndexError;
use crate::infrastructure::discovery::EntityFile;

use super::load_entity;

/// Load `files` on up to `workers` scoped threads.
///
/// Results come back in path order regardless of which thread finished
/// first.
pub fn load_files(
    files: &[EntityFile],
    base_path: &Path,
    workers: usize,
) -> (Vec<Entity>, Vec<IndexError>) {
    if files.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let chunk_size = files.len().div_ceil(workers.max(1));
    let (tx, rx) = mpsc::channel::<(PathBuf, Result<Entity, IndexError>)>();

    thread::scope(|scope| {
        for chunk in files.chunks(chunk_size) {
            let tx = tx.clone();
            scope.spawn(move || {
                for file in chunk {
                    let _ = tx.send((file.path.clone(), load_entity(file, base_path)));
                }
            });
        }
    });
    drop(tx);

    let mut results: Vec<_> = rx.into_iter().collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));

    let mut entities = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for (path, result) in results {
        match result {
            Ok(entity) => entities.push(entity),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "failed to load entity");
                errors.push(err);
            }
        }
    }
    (entities, errors)
}
