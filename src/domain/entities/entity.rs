//! Entity
//!
//! A loaded entity definition. Entities are produced by the loader and are
//! immutable afterwards; resolution results live in the index record.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Fingerprint, Layer, Locator, SourcePath};

/// Column-level metadata of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Semantic tag such as `BK`, `SK` or `SCD2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_type: Option<String>,
}

/// Scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Flag(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Flag(v) => write!(f, "{}", v),
            ParameterValue::Integer(v) => write!(f, "{}", v),
            ParameterValue::Decimal(v) => write!(f, "{}", v),
            ParameterValue::Text(v) => f.write_str(v),
        }
    }
}

/// Which part of a definition a reference comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `functions.sources` entry of type `model`
    Source,
    /// `relationships` entry
    Relationship,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Source => f.write_str("source"),
            EdgeKind::Relationship => f.write_str("relationship"),
        }
    }
}

/// Relationship cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardinalityRole {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl CardinalityRole {
    pub const ALL: [CardinalityRole; 4] = [
        CardinalityRole::OneToOne,
        CardinalityRole::OneToMany,
        CardinalityRole::ManyToOne,
        CardinalityRole::ManyToMany,
    ];

    pub fn token(self) -> &'static str {
        match self {
            CardinalityRole::OneToOne => "oneToOne",
            CardinalityRole::OneToMany => "oneToMany",
            CardinalityRole::ManyToOne => "manyToOne",
            CardinalityRole::ManyToMany => "manyToMany",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.token() == token)
    }
}

/// A pair of attribute names linking the declaring entity to the referenced one.
///
/// For sources this is `{ source: referenced, target: local }`; for
/// relationships `{ attribute: local, keyAttribute: referenced }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingPair {
    pub local: String,
    pub referenced: String,
}

impl MappingPair {
    pub fn new(local: impl Into<String>, referenced: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            referenced: referenced.into(),
        }
    }
}

/// A reference as written in the definition, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDecl {
    pub kind: EdgeKind,
    /// Locator expression, fully or partially qualified
    pub expression: String,
    pub role: Option<CardinalityRole>,
    pub mappings: Vec<MappingPair>,
}

impl ReferenceDecl {
    pub fn source(expression: impl Into<String>, mappings: Vec<MappingPair>) -> Self {
        Self {
            kind: EdgeKind::Source,
            expression: expression.into(),
            role: None,
            mappings,
        }
    }

    pub fn relationship(
        expression: impl Into<String>,
        role: CardinalityRole,
        mappings: Vec<MappingPair>,
    ) -> Self {
        Self {
            kind: EdgeKind::Relationship,
            expression: expression.into(),
            role: Some(role),
            mappings,
        }
    }
}

/// A loaded entity definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub locator: Locator,
    pub display_name: String,
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
    pub sources: Vec<ReferenceDecl>,
    pub relationships: Vec<ReferenceDecl>,
    pub parameters: BTreeMap<String, ParameterValue>,
    pub tags: BTreeSet<String>,
    pub fingerprint: Fingerprint,
    /// File the definition was read from
    pub path: PathBuf,
    /// `path` relative to the solution base
    pub source_path: SourcePath,
}

impl Entity {
    pub fn layer(&self) -> Layer {
        self.locator.layer()
    }

    pub fn product(&self) -> &str {
        self.locator.product()
    }

    pub fn module(&self) -> &str {
        self.locator.module()
    }

    pub fn name(&self) -> &str {
        self.locator.name()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Sources first, then relationships, each in declaration order.
    pub fn references(&self) -> impl Iterator<Item = &ReferenceDecl> {
        self.sources.iter().chain(self.relationships.iter())
    }
}
