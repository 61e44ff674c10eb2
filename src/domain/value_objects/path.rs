//! Source path value object
//!
//! A file path as it appears in the index and in reports: relative to the
//! solution base path, `/`-separated on every platform.

use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcePath(String);

impl SourcePath {
    /// Express `path` relative to `base`.
    ///
    /// Paths outside `base` are kept whole (still with `/` separators) so
    /// that they remain unambiguous.
    pub fn relative_to(path: &Path, base: &Path) -> Self {
        let relative = path.strip_prefix(base).unwrap_or(path);
        Self::from_path(relative)
    }

    /// Normalize separators without relativizing.
    pub fn from_path(path: &Path) -> Self {
        let mut parts: Vec<String> = Vec::new();
        let mut rooted = false;
        for component in path.components() {
            match component {
                Component::Prefix(prefix) => {
                    parts.push(prefix.as_os_str().to_string_lossy().into_owned())
                }
                Component::RootDir => rooted = true,
                Component::CurDir => {}
                Component::ParentDir => parts.push("..".to_string()),
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            }
        }
        let joined = parts.join("/");
        if rooted {
            Self(format!("/{}", joined))
        } else {
            Self(joined)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourcePath {
    fn from(value: &str) -> Self {
        Self::from_path(Path::new(value))
    }
}
