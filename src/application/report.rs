//! Validation Report
//!
//! What a `validate-index` run found and did. Rendered by the UI as text or
//! JSON; never stored in the index.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ConfigWarning;
use crate::domain::entities::Diagnostic;
use crate::domain::value_objects::{Layer, Locator};

/// How the snapshot was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    Full,
    Incremental,
}

impl std::fmt::Display for IndexMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexMode::Full => f.write_str("full"),
            IndexMode::Incremental => f.write_str("incremental"),
        }
    }
}

/// Result of a validation run
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub mode: IndexMode,
    /// Whether a new snapshot was written
    pub committed: bool,
    pub index_path: PathBuf,
    /// Definition files examined
    pub files: usize,
    /// Indexed entities per layer
    pub counts: BTreeMap<Layer, usize>,
    pub diagnostics: Vec<Diagnostic>,
    /// The error that prevented the commit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal: Option<Diagnostic>,
    pub warnings: Vec<String>,
    pub config_warnings: Vec<ConfigWarning>,
    pub revalidated: Vec<Locator>,
    pub reused: Vec<Locator>,
    pub removed: Vec<Locator>,
    /// Entities whose closure fingerprint changed since the last commit
    pub stale: Vec<Locator>,
    pub finished_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn new(mode: IndexMode, index_path: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            committed: false,
            index_path: index_path.into(),
            files: 0,
            counts: Layer::ALL.iter().map(|l| (*l, 0)).collect(),
            diagnostics: Vec::new(),
            fatal: None,
            warnings: Vec::new(),
            config_warnings: Vec::new(),
            revalidated: Vec::new(),
            reused: Vec::new(),
            removed: Vec::new(),
            stale: Vec::new(),
            finished_at: Utc::now(),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len() + self.config_warnings.len()
    }

    pub fn is_success(&self) -> bool {
        self.fatal.is_none()
    }

    /// One-line description of the fatal error, if any.
    pub fn fatal_summary(&self) -> String {
        match &self.fatal {
            Some(fatal) => fatal.message.clone(),
            None => "no fatal error".to_string(),
        }
    }

    /// Process exit code: 1 on a fatal error, or on any error when `strict`.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if !self.is_success() || (strict && self.error_count() > 0) {
            1
        } else {
            0
        }
    }
}
