//! Common test utilities for modeldex contract and CLI tests.
//!
//! This module provides:
//! - `TestSolution`: isolated solution directory with library and CLI helpers
//! - Fixtures: entity definition builder and a seeded customer chain

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
