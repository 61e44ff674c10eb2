//! Solution descriptor loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{Layer, DEFAULT_IGNORE_FILE};
use crate::infrastructure::fs::expand_home;

use super::types::{
    ConfigError, ConfigWarning, LayerRoots, SolutionConfig, SolutionFile, INDEX_FILE,
    SOLUTION_FILE,
};

/// Load a descriptor and collect non-fatal warnings (unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(SolutionConfig, Vec<ConfigWarning>), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);
    let file: SolutionFile = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    let descriptor_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut config = resolve(file, &descriptor_dir);
    config.descriptor = Some(path.to_path_buf());
    Ok((config, warnings))
}

/// Turn the raw file into a resolved configuration.
///
/// `base_path` is relative to the descriptor directory; every other relative
/// path is relative to `base_path`. A leading `~` expands to the home directory.
pub fn resolve(file: SolutionFile, descriptor_dir: &Path) -> SolutionConfig {
    let base_path = match &file.base_path {
        Some(base) => anchor(base, descriptor_dir),
        None => descriptor_dir.to_path_buf(),
    };

    let mut layer_roots = LayerRoots::under(&base_path);
    for layer in Layer::ALL {
        if let Some(root) = file.layers.get(layer) {
            layer_roots.set(layer, anchor(root, &base_path));
        }
    }

    SolutionConfig {
        descriptor: None,
        index_path: file
            .index_path
            .as_deref()
            .map(|p| anchor(p, &base_path))
            .unwrap_or_else(|| base_path.join(INDEX_FILE)),
        layer_roots,
        workers: file.workers,
        strict: file.strict,
        ignore_file: file
            .discovery
            .ignore_file
            .unwrap_or_else(|| DEFAULT_IGNORE_FILE.to_string()),
        base_path,
    }
}

/// Search `start` and its ancestors for a solution descriptor.
pub fn find_descriptor(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(SOLUTION_FILE))
        .find(|candidate| candidate.is_file())
}

/// Locate and load the solution descriptor, then apply environment overrides.
///
/// With no explicit path, `cwd` and its ancestors are searched.
pub fn load_solution(
    explicit: Option<&Path>,
    cwd: &Path,
) -> Result<(SolutionConfig, Vec<ConfigWarning>), ConfigError> {
    let path = match explicit {
        Some(path) if path.is_dir() => path.join(SOLUTION_FILE),
        Some(path) => path.to_path_buf(),
        None => find_descriptor(cwd).ok_or_else(|| ConfigError::NotFound {
            path: cwd.join(SOLUTION_FILE),
        })?,
    };
    let (config, warnings) = load_with_warnings(&path)?;
    tracing::debug!(descriptor = %path.display(), base = %config.base_path.display(), "loaded solution");
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (MODELDEX_* prefix)
pub fn with_env_overrides(mut config: SolutionConfig) -> SolutionConfig {
    if let Ok(path) = std::env::var("MODELDEX_INDEX_PATH") {
        if !path.trim().is_empty() {
            config.index_path = anchor(Path::new(&path), &config.base_path);
        }
    }

    if let Ok(workers) = std::env::var("MODELDEX_WORKERS") {
        match workers.trim().parse::<usize>() {
            Ok(n) => config.workers = n,
            Err(_) => tracing::warn!(value = %workers, "ignoring invalid MODELDEX_WORKERS"),
        }
    }

    if let Ok(strict) = std::env::var("MODELDEX_STRICT") {
        config.strict = matches!(strict.to_lowercase().as_str(), "1" | "true" | "yes");
    }

    config
}

fn anchor(path: &Path, base: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "base_path",
        "index_path",
        "workers",
        "strict",
        "layers",
        "raw",
        "stage",
        "core",
        "curated",
        "discovery",
        "ignore_file",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
