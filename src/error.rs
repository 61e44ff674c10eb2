//! Error types for modeldex
//!
//! `IndexError` is the diagnostic taxonomy produced while building the index;
//! most of its variants are accumulated into a report instead of being raised
//! one at a time. `ModeldexError` is the library-level error for everything
//! that stops a run outright (configuration, storage, I/O).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ValidationReport;
use crate::config::ConfigError;
use crate::domain::ports::IndexStoreError;
use crate::domain::value_objects::{IgnoreError, Layer, Locator, LocatorError};

/// Result type alias for modeldex operations
pub type ModeldexResult<T> = Result<T, ModeldexError>;

/// One violated structural constraint inside an entity definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value (e.g. `/entity/attribute/2/name`)
    pub pointer: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.pointer, self.message)
        }
    }
}

/// How an error affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported; the run still commits.
    Error,
    /// Aborts the commit.
    Fatal,
}

/// Diagnostics raised while loading, resolving and validating entities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// An entity's own identity could not be formed from its path and name
    #[error("malformed identifier in {}: {reason}", .file.display())]
    MalformedIdentifier { file: PathBuf, reason: String },

    /// A locator or reference expression is not well formed
    #[error("malformed locator '{input}'{}: {reason}", referrer_suffix(.referrer.as_ref()))]
    MalformedLocator {
        referrer: Option<Locator>,
        input: String,
        reason: String,
    },

    /// The definition violates the structural schema (every violation listed)
    #[error("schema validation failed for {} ({} violation(s)):\n{}", .file.display(), .violations.len(), render_violations(.violations))]
    SchemaValidation {
        file: PathBuf,
        violations: Vec<SchemaViolation>,
    },

    #[error("unresolved reference '{reference}' in {referrer}: no matching entity")]
    UnresolvedReference { referrer: Locator, reference: String },

    #[error("ambiguous reference '{reference}' in {referrer}: matches {}", join_locators(.candidates))]
    AmbiguousReference {
        referrer: Locator,
        reference: String,
        candidates: Vec<Locator>,
    },

    #[error("unknown attribute '{attribute}' on {target} (referenced by {referrer})")]
    UnknownAttribute {
        referrer: Locator,
        target: Locator,
        attribute: String,
    },

    #[error("illegal layer reference: {referrer} ({referrer_layer}) may not reference {target} ({target_layer})")]
    IllegalLayerReference {
        referrer: Locator,
        referrer_layer: Layer,
        target: Locator,
        target_layer: Layer,
    },

    /// A reference declared by an entity whose layer may reference nothing
    #[error("illegal layer reference: {referrer} ({referrer_layer}) may not declare references, found '{reference}'")]
    ReferenceNotAllowed {
        referrer: Locator,
        referrer_layer: Layer,
        reference: String,
    },

    #[error("circular dependency: {}", render_cycle(.cycle))]
    CircularDependency { cycle: Vec<Locator> },

    #[error("duplicate locator {locator}: claimed by {} and {}", .first.display(), .second.display())]
    DuplicateLocator {
        locator: Locator,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("cannot read {}: {message}", .file.display())]
    FileAccess { file: PathBuf, message: String },

    #[error("locator was not found: {locator}")]
    NotFound { locator: String },
}

impl IndexError {
    /// Whether this error aborts the index commit.
    pub fn severity(&self) -> Severity {
        match self {
            IndexError::IllegalLayerReference { .. }
            | IndexError::ReferenceNotAllowed { .. }
            | IndexError::CircularDependency { .. }
            | IndexError::DuplicateLocator { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Stable name of the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            IndexError::MalformedIdentifier { .. } => "MalformedIdentifierError",
            IndexError::MalformedLocator { .. } => "MalformedLocatorError",
            IndexError::SchemaValidation { .. } => "SchemaValidationError",
            IndexError::UnresolvedReference { .. } => "UnresolvedReferenceError",
            IndexError::AmbiguousReference { .. } => "AmbiguousReferenceError",
            IndexError::UnknownAttribute { .. } => "UnknownAttributeError",
            IndexError::IllegalLayerReference { .. }
            | IndexError::ReferenceNotAllowed { .. } => "IllegalLayerReferenceError",
            IndexError::CircularDependency { .. } => "CircularDependencyError",
            IndexError::DuplicateLocator { .. } => "DuplicateLocatorError",
            IndexError::FileAccess { .. } => "FileAccessError",
            IndexError::NotFound { .. } => "NotFoundError",
        }
    }

    /// Locators named by this error, in the order they appear in the message.
    pub fn locators(&self) -> Vec<&Locator> {
        match self {
            IndexError::MalformedLocator { referrer, .. } => referrer.iter().collect(),
            IndexError::UnresolvedReference { referrer, .. }
            | IndexError::ReferenceNotAllowed { referrer, .. } => vec![referrer],
            IndexError::AmbiguousReference {
                referrer,
                candidates,
                ..
            } => std::iter::once(referrer).chain(candidates.iter()).collect(),
            IndexError::UnknownAttribute {
                referrer, target, ..
            }
            | IndexError::IllegalLayerReference {
                referrer, target, ..
            } => vec![referrer, target],
            IndexError::CircularDependency { cycle } => cycle.iter().collect(),
            IndexError::DuplicateLocator { locator, .. } => vec![locator],
            IndexError::MalformedIdentifier { .. }
            | IndexError::SchemaValidation { .. }
            | IndexError::FileAccess { .. }
            | IndexError::NotFound { .. } => Vec::new(),
        }
    }

    /// Source file named by this error, if any.
    pub fn file(&self) -> Option<&Path> {
        match self {
            IndexError::MalformedIdentifier { file, .. }
            | IndexError::SchemaValidation { file, .. }
            | IndexError::FileAccess { file, .. } => Some(file),
            IndexError::DuplicateLocator { second, .. } => Some(second),
            _ => None,
        }
    }

    pub(crate) fn from_locator_error(err: LocatorError, referrer: Option<&Locator>) -> Self {
        match err {
            LocatorError::MalformedLocator { input, reason } => IndexError::MalformedLocator {
                referrer: referrer.cloned(),
                input,
                reason,
            },
            LocatorError::MalformedIdentifier { segment, reason } => IndexError::MalformedLocator {
                referrer: referrer.cloned(),
                input: segment,
                reason,
            },
        }
    }
}

fn referrer_suffix(referrer: Option<&Locator>) -> String {
    referrer
        .map(|l| format!(" in {}", l))
        .unwrap_or_default()
}

fn join_locators(locators: &[Locator]) -> String {
    locators
        .iter()
        .map(Locator::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_cycle(cycle: &[Locator]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(Locator::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.as_str());
    }
    parts.join(" -> ")
}

fn render_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors that stop a modeldex run.
#[derive(Error, Debug)]
pub enum ModeldexError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] IndexStoreError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Ignore(#[from] IgnoreError),

    #[error("{layer} layer root not found: {}", .path.display())]
    LayerRootNotFound { layer: Layer, path: PathBuf },

    /// Validation hit a fatal error; the stored index was left untouched
    #[error("index validation failed: {}", .report.fatal_summary())]
    ValidationFailed { report: Box<ValidationReport> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
