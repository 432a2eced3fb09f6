//! # FlexKit Test
//!
//! Fixture-driven test harness for the FlexKit layout engine.
//!
//! A fixture is a JSON description of a box tree plus a viewport. The
//! harness builds the tree, runs a layout pass, formats the resolved
//! geometry as an indented text dump, and compares it against a sibling
//! `.expected` golden file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flexkit_test::FixtureRunner;
//!
//! let runner = FixtureRunner::new();
//! let summary = runner.run_all("fixtures".as_ref())?;
//! println!("Passed: {}/{}", summary.passed, summary.total);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod fixture;
pub mod runner;

pub use fixture::{build_tree, BoxSpec, FixtureDoc};
pub use runner::{format_layout, FixtureRunner};

/// Errors that can occur while running fixtures.
#[derive(Error, Debug)]
pub enum TestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid fixture format: {0}")]
    InvalidFormat(String),

    #[error("Fixture not found: {0}")]
    NotFound(String),
}

/// Test result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
}

/// Result of a single fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    /// Failure diff or error message.
    pub message: Option<String>,
}

impl TestResult {
    pub fn pass(name: &str, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Pass,
            duration_ms,
            message: None,
        }
    }

    pub fn fail_with_diff(name: &str, duration_ms: u64, diff: String) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Fail,
            duration_ms,
            message: Some(diff),
        }
    }

    pub fn error(name: &str, duration_ms: u64, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Error,
            duration_ms,
            message: Some(message),
        }
    }
}

/// Aggregated results of a fixture run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub results: Vec<TestResult>,
}

impl TestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: TestResult) {
        self.total += 1;
        match result.status {
            TestStatus::Pass => self.passed += 1,
            TestStatus::Fail => self.failed += 1,
            TestStatus::Error => self.errors += 1,
        }
        self.results.push(result);
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}
