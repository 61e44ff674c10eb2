use std::path::Path;

use anyhow::Result;
use modeldex::infrastructure::{FsEntitySource, JsonIndexRepository};
use modeldex::{load_solution, ModelCoordinator, ModeldexError};

pub(crate) type Coordinator = ModelCoordinator<FsEntitySource, JsonIndexRepository>;

/// Locate and load the solution descriptor, then open a coordinator over it.
///
/// `--strict` on the command line wins over the descriptor and environment.
pub(crate) fn open_coordinator(solution: Option<&Path>, strict: bool) -> Result<(Coordinator, bool)> {
    let cwd = std::env::current_dir()?;
    let (mut config, warnings) = load_solution(solution, &cwd).map_err(ModeldexError::from)?;
    if strict {
        config = config.with_strict(true);
    }

    for warning in &warnings {
        tracing::warn!(%warning, "solution descriptor");
    }
    tracing::debug!(
        descriptor = ?config.descriptor,
        base = %config.base_path.display(),
        index = %config.index_path.display(),
        "solution loaded"
    );

    let strict = config.strict;
    Ok((ModelCoordinator::open(config).with_config_warnings(warnings), strict))
}
