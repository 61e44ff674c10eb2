//! Isolated solution environment for contract and CLI tests.
//!
//! `TestSolution` owns a temp directory holding a `solution.toml`, the layer
//! roots and (after a validation) `index.json`. It can drive the library
//! directly or run the `modeldex` binary against the directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use modeldex::infrastructure::{FsEntitySource, JsonIndexRepository};
use modeldex::{Locator, ModelCoordinator, SolutionConfig};
use serde_json::Value;
use tempfile::TempDir;

use super::fixtures::EMPTY_SOLUTION;

pub type Coordinator = ModelCoordinator<FsEntitySource, JsonIndexRepository>;

/// Result of running the modeldex CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as the single JSON document `--json` prints.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| {
            panic!("stdout is not JSON ({e}):\n{}", self.combined_output())
        })
    }
}

pub struct TestSolution {
    pub root: TempDir,
}

impl TestSolution {
    /// Empty solution with a default descriptor.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::write(root.path().join("solution.toml"), EMPTY_SOLUTION)
            .expect("write solution.toml");
        Self { root }
    }

    /// Solution pre-populated with `entities`.
    pub fn with_entities<'a>(entities: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        let solution = Self::new();
        for (locator, doc) in entities {
            solution.write_entity(locator, &doc);
        }
        solution
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn index_path(&self) -> PathBuf {
        self.path("index.json")
    }

    /// Definition file location for a locator: `<Layer>/<Product>/<Module>/<Name>.json`.
    pub fn entity_path(&self, locator: &str) -> PathBuf {
        let locator = Locator::parse(locator).expect("valid locator");
        self.root
            .path()
            .join(locator.layer().token())
            .join(locator.product())
            .join(locator.module())
            .join(format!("{}.json", locator.name()))
    }

    pub fn write_entity(&self, locator: &str, doc: &Value) {
        self.write_raw(locator, &serde_json::to_string_pretty(doc).expect("serialize"));
    }

    pub fn write_raw(&self, locator: &str, content: &str) {
        let path = self.entity_path(locator);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        std::fs::write(&path, content).expect("write entity");
    }

    pub fn remove_entity(&self, locator: &str) {
        std::fs::remove_file(self.entity_path(locator)).expect("remove entity");
    }

    pub fn read_index(&self) -> String {
        std::fs::read_to_string(self.index_path()).unwrap_or_default()
    }

    pub fn config(&self) -> SolutionConfig {
        SolutionConfig::from_base(self.root.path()).with_workers(2)
    }

    pub fn coordinator(&self) -> Coordinator {
        ModelCoordinator::open(self.config())
    }

    /// Run the modeldex binary from the solution directory.
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.root.path(), args)
    }

    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_modeldex"))
            .current_dir(cwd)
            .args(args)
            .env("NO_COLOR", "1")
            .env("TERM", "dumb")
            .env_remove("MODELDEX_LOG")
            .env_remove("MODELDEX_STRICT")
            .env_remove("MODELDEX_INDEX_PATH")
            .env_remove("MODELDEX_WORKERS")
            .env_remove("GITHUB_ACTIONS")
            .output()
            .expect("failed to execute modeldex");
        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

pub fn loc(s: &str) -> Locator {
    Locator::parse(s).expect("valid locator")
}
