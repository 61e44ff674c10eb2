use crossterm::style::Color;

/// Design tokens for the modeldex CLI.
///
/// Design constraints:
/// - Only 5 semantic colors (`colors::*`)
/// - All icons must be sourced from this module
pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const FATAL: &str = "‼";
    pub const WARNING: &str = "⚠";
    pub const STALE: &str = "●";
    pub const FRESH: &str = "○";
    pub const ARROW: &str = "↳";
    pub const INDEX: &str = "⌗";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[ERROR]";
    pub const FATAL: &str = "[FATAL]";
    pub const WARNING: &str = "[WARN]";
    pub const STALE: &str = "[*]";
    pub const FRESH: &str = "[ ]";
    pub const ARROW: &str = "[>]";
    pub const INDEX: &str = "[INDEX]";
}
