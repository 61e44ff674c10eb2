//! Locator value object
//!
//! A locator is the canonical identity of an entity: `/Layer/Product/Module/Name`.
//! Equality, hashing and ordering all go through the canonical string, which
//! makes the locator string the tie-break order for every sorted output.
//! Matching a written reference against a locator ignores case; the spelling
//! of each segment is preserved.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::Layer;

/// Segment separator.
pub const SEPARATOR: char = '/';

/// Number of segments in a fully qualified locator.
pub const SEGMENT_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("malformed identifier '{segment}': {reason}")]
    MalformedIdentifier { segment: String, reason: String },

    #[error("malformed locator '{input}': {reason}")]
    MalformedLocator { input: String, reason: String },
}

/// Canonical entity identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    layer: Layer,
    product: String,
    module: String,
    name: String,
    repr: String,
}

impl Locator {
    /// Build a locator from its parts.
    ///
    /// Segments are kept as given (case-preserving). Each must be non-empty
    /// and must not contain the separator.
    pub fn encode(
        layer: Layer,
        product: &str,
        module: &str,
        name: &str,
    ) -> Result<Self, LocatorError> {
        for (label, segment) in [("product", product), ("module", module), ("name", name)] {
            check_segment(label, segment)?;
        }

        let repr = format!(
            "{sep}{}{sep}{}{sep}{}{sep}{}",
            layer.token(),
            product,
            module,
            name,
            sep = SEPARATOR
        );

        Ok(Self {
            layer,
            product: product.to_string(),
            module: module.to_string(),
            name: name.to_string(),
            repr,
        })
    }

    /// Parse a fully qualified locator string.
    ///
    /// A missing leading `/` is tolerated and the layer token is matched
    /// case-insensitively; the result is always in canonical form.
    pub fn parse(input: &str) -> Result<Self, LocatorError> {
        let segments = split_segments(input)?;
        if segments.len() != SEGMENT_COUNT {
            return Err(LocatorError::MalformedLocator {
                input: input.to_string(),
                reason: format!(
                    "expected {} segments (/Layer/Product/Module/Name), found {}",
                    SEGMENT_COUNT,
                    segments.len()
                ),
            });
        }

        let layer = Layer::from_token(segments[0]).ok_or_else(|| LocatorError::MalformedLocator {
            input: input.to_string(),
            reason: format!("unknown layer '{}'", segments[0]),
        })?;

        Self::encode(layer, segments[1], segments[2], segments[3]).map_err(|e| {
            LocatorError::MalformedLocator {
                input: input.to_string(),
                reason: e.to_string(),
            }
        })
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// The four segments, layer first.
    pub fn segments(&self) -> [&str; SEGMENT_COUNT] {
        [self.layer.token(), &self.product, &self.module, &self.name]
    }

    /// True when the trailing segments of this locator match `suffix`,
    /// ignoring case.
    ///
    /// Used for partially qualified references (`Name`, `Module/Name`,
    /// `Product/Module/Name`) and, with all four segments, for fully
    /// qualified ones.
    pub fn ends_with(&self, suffix: &[&str]) -> bool {
        if suffix.is_empty() || suffix.len() > SEGMENT_COUNT {
            return false;
        }
        let segments = self.segments();
        segments[SEGMENT_COUNT - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(own, written)| same_segment(own, written))
    }

    /// Same entity address, ignoring case.
    pub fn matches(&self, other: &Locator) -> bool {
        self.layer == other.layer && self.ends_with(&other.segments())
    }
}

/// Segment comparison used when matching references.
fn same_segment(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Split a locator or reference expression into its segments.
///
/// Rejects empty input, empty segments and more than four segments. A
/// four-segment expression must start with a layer token.
pub fn split_segments(input: &str) -> Result<Vec<&str>, LocatorError> {
    let trimmed = input.trim();
    let body = trimmed.strip_prefix(SEPARATOR).unwrap_or(trimmed);

    if body.is_empty() {
        return Err(LocatorError::MalformedLocator {
            input: input.to_string(),
            reason: "empty locator".to_string(),
        });
    }

    let segments: Vec<&str> = body.split(SEPARATOR).collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(LocatorError::MalformedLocator {
            input: input.to_string(),
            reason: "empty segment".to_string(),
        });
    }

    if segments.len() > SEGMENT_COUNT {
        return Err(LocatorError::MalformedLocator {
            input: input.to_string(),
            reason: format!(
                "too many segments ({}), at most {} allowed",
                segments.len(),
                SEGMENT_COUNT
            ),
        });
    }

    if segments.len() == SEGMENT_COUNT && Layer::from_token(segments[0]).is_none() {
        return Err(LocatorError::MalformedLocator {
            input: input.to_string(),
            reason: format!("unknown layer '{}'", segments[0]),
        });
    }

    Ok(segments)
}

fn check_segment(label: &str, segment: &str) -> Result<(), LocatorError> {
    if segment.trim().is_empty() {
        return Err(LocatorError::MalformedIdentifier {
            segment: segment.to_string(),
            reason: format!("{} segment is empty", label),
        });
    }
    if segment.contains(SEPARATOR) {
        return Err(LocatorError::MalformedIdentifier {
            segment: segment.to_string(),
            reason: format!("{} segment contains '{}'", label, SEPARATOR),
        });
    }
    Ok(())
}

impl PartialEq for Locator {
    fn eq(&self, other: &Self) -> bool {
        self.repr == other.repr
    }
}

impl Eq for Locator {}

impl Hash for Locator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.repr.hash(state);
    }
}

impl PartialOrd for Locator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Locator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.repr.cmp(&other.repr)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl TryFrom<String> for Locator {
    type Error = LocatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locator::parse(&value)
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.repr
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.repr
    }
}
