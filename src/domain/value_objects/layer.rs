//! Layer value object
//!
//! The four ordered model layers. The derived `Ord` is the layering order:
//! `Raw < Stage < Core < Curated`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A model layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Raw,
    Stage,
    Core,
    Curated,
}

impl Layer {
    /// All layers in layering order.
    pub const ALL: [Layer; 4] = [Layer::Raw, Layer::Stage, Layer::Core, Layer::Curated];

    /// Canonical token used inside locators.
    pub fn token(self) -> &'static str {
        match self {
            Layer::Raw => "Raw",
            Layer::Stage => "Stage",
            Layer::Core => "Core",
            Layer::Curated => "Curated",
        }
    }

    /// Parse a layer token, case-insensitively. `Staging` is accepted for `Stage`.
    pub fn from_token(token: &str) -> Option<Layer> {
        match token.to_ascii_lowercase().as_str() {
            "raw" => Some(Layer::Raw),
            "stage" | "staging" => Some(Layer::Stage),
            "core" => Some(Layer::Core),
            "curated" => Some(Layer::Curated),
            _ => None,
        }
    }

    /// Position in the layering order (0 for Raw).
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::from_token(s).ok_or_else(|| {
            format!(
                "unknown layer '{}' (expected one of: raw, stage, core, curated)",
                s
            )
        })
    }
}
