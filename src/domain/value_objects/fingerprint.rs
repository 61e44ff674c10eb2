//! Fingerprint value object
//!
//! A SHA-256 content hash over the normalized form of an entity definition.
//! Used for change detection in the index.
//!
//! Normalization makes the hash insensitive to formatting: object keys are
//! emitted in sorted order with no whitespace, array order is preserved
//! (attribute order is meaningful) except for `entity.tags`, which is a set.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Content fingerprint, `sha256:<hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Prefix for SHA-256 fingerprints
    pub const PREFIX: &'static str = "sha256:";

    /// Wrap a raw hash string, adding the prefix when missing.
    pub fn new(raw_hash: &str) -> Self {
        if raw_hash.starts_with(Self::PREFIX) {
            Self(raw_hash.to_string())
        } else {
            Self(format!("{}{}", Self::PREFIX, raw_hash))
        }
    }

    /// Hash arbitrary bytes.
    pub fn from_bytes(content: &[u8]) -> Self {
        let hash = Sha256::digest(content);
        Self(format!("{}{:x}", Self::PREFIX, hash))
    }

    /// Hash an entity definition in normalized form.
    pub fn from_definition(definition: &Value) -> Self {
        Self::from_bytes(normalized_definition(definition).as_bytes())
    }

    /// Combine an entity's own fingerprint with the closure fingerprints of
    /// its direct dependencies.
    ///
    /// Dependencies must be supplied in locator order; since each dependency
    /// closure already covers its own dependencies, the result covers the
    /// whole transitive closure.
    pub fn closure<'a, I>(own: &Fingerprint, dependencies: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Fingerprint)>,
    {
        let mut hasher = Sha256::new();
        hasher.update(own.as_str().as_bytes());
        for (locator, fingerprint) in dependencies {
            hasher.update(b"\n");
            hasher.update(locator.as_bytes());
            hasher.update(b"=");
            hasher.update(fingerprint.as_str().as_bytes());
        }
        Self(format!("{}{:x}", Self::PREFIX, hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digest without the prefix.
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }

    /// Shortened digest for display.
    pub fn short(&self) -> &str {
        let hex = self.hex();
        &hex[..hex.len().min(12)]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical text form of an entity definition.
pub fn normalized_definition(definition: &Value) -> String {
    let mut normalized = definition.clone();
    if let Some(tags) = normalized
        .get_mut("entity")
        .and_then(|e| e.get_mut("tags"))
        .and_then(Value::as_array_mut)
    {
        tags.sort_by_key(canonical_json);
        tags.dedup();
    }
    canonical_json(&normalized)
}

/// Serialize a JSON value with sorted object keys and no whitespace.
///
/// Does not rely on the map ordering of `serde_json::Map`, which changes
/// with the `preserve_order` feature.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
