//! File System Helpers
//!
//! Atomic writes, advisory locking and home directory expansion.

mod atomic;
mod home;

pub use atomic::{write_atomic, FileLock};
pub use home::{expand_home, modeldex_home_dir, MODELDEX_TEST_HOME_VAR};
