//! Terminal and JSON rendering for the CLI.

pub mod ci;
pub mod context;
pub mod error;
pub mod json;
pub mod primitives;
pub mod terminal;
pub mod theme;
pub mod views;
