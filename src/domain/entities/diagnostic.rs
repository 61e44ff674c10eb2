//! Diagnostic entity
//!
//! The reportable form of an [`IndexError`]. Reference-level diagnostics are
//! stored on index records, so they survive an incremental refresh unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Locator, SourcePath};
use crate::error::{IndexError, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locators: Vec<Locator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<SourcePath>,
}

impl Diagnostic {
    /// Convert an error, expressing its file relative to `base`.
    pub fn from_error(error: &IndexError, base: &Path) -> Self {
        Self {
            severity: error.severity(),
            kind: error.kind().to_string(),
            message: error.to_string(),
            locators: error.locators().into_iter().cloned().collect(),
            file: error.file().map(|f| SourcePath::relative_to(f, base)),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}
