//! Ignore patterns value object
//!
//! Loads a layer root's ignore file (`.modelignore` by default) and matches
//! entity paths against it using gitignore semantics.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Default ignore file name looked up at each layer root.
pub const DEFAULT_IGNORE_FILE: &str = ".modelignore";

/// Maximum ignore file size (64KB)
const MAX_FILE_SIZE: u64 = 65536;

/// Maximum number of patterns allowed
const MAX_PATTERNS: usize = 1000;

/// Patterns loaded from an ignore file.
#[derive(Debug)]
pub struct IgnorePatterns {
    matcher: Gitignore,
    pattern_count: usize,
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        Self::empty()
    }
}

impl IgnorePatterns {
    /// Pattern set that matches nothing.
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
            pattern_count: 0,
        }
    }

    /// Load `file_name` from `root`. A missing file yields an empty set.
    pub fn load(root: &Path, file_name: &str) -> Result<Self, IgnoreError> {
        let ignore_path = root.join(file_name);

        if !ignore_path.exists() {
            return Ok(Self::empty());
        }

        let metadata = fs::metadata(&ignore_path).map_err(|e| IgnoreError::Io {
            path: ignore_path.clone(),
            message: e.to_string(),
        })?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(IgnoreError::FileTooLarge {
                path: ignore_path,
                size: metadata.len(),
                limit: MAX_FILE_SIZE,
            });
        }

        let content = fs::read_to_string(&ignore_path).map_err(|e| IgnoreError::Io {
            path: ignore_path.clone(),
            message: e.to_string(),
        })?;
        Self::from_content(root, &ignore_path, &content)
    }

    /// Parse patterns from string content.
    pub fn from_content(root: &Path, source_path: &Path, content: &str) -> Result<Self, IgnoreError> {
        let mut builder = GitignoreBuilder::new(root);
        let mut pattern_count = 0;

        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            pattern_count += 1;
            if pattern_count > MAX_PATTERNS {
                return Err(IgnoreError::TooManyPatterns {
                    path: source_path.to_path_buf(),
                    count: pattern_count,
                    limit: MAX_PATTERNS,
                });
            }

            if let Err(e) = builder.add_line(Some(source_path.to_path_buf()), line) {
                return Err(IgnoreError::InvalidPattern {
                    path: source_path.to_path_buf(),
                    line: line_num + 1,
                    pattern: line.to_string(),
                    message: e.to_string(),
                });
            }
        }

        let matcher = builder
            .build()
            .map_err(|e| IgnoreError::BuildFailed(e.to_string()))?;

        Ok(Self {
            matcher,
            pattern_count,
        })
    }

    /// Check a path relative to the layer root.
    pub fn is_ignored(&self, rel_path: &Path, is_dir: bool) -> bool {
        if self.pattern_count == 0 {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IgnoreError {
    #[error("ignore file exceeds {}KB limit ({size} bytes): {}", .limit / 1024, .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("ignore file has {count} patterns, exceeds {limit} limit: {}", .path.display())]
    TooManyPatterns {
        path: PathBuf,
        count: usize,
        limit: usize,
    },

    #[error("invalid pattern at {}:{line}: '{pattern}' - {message}", .path.display())]
    InvalidPattern {
        path: PathBuf,
        line: usize,
        pattern: String,
        message: String,
    },

    #[error("failed to build ignore matcher: {0}")]
    BuildFailed(String),

    #[error("failed to read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}
