//! Fixture discovery, execution, and golden-file comparison.

use std::fs;
use std::path::Path;
use std::time::Instant;

use flexkit_layout::{
    Constraints, HeuristicTextMeasure, LayoutContext, LayoutTree, NodeId,
};
use similar::TextDiff;
use tracing::debug;

use crate::fixture::FixtureDoc;
use crate::{fixture, TestError, TestResult, TestSummary};

/// Runs `.json` fixtures against their `.expected` golden files.
#[derive(Debug, Default)]
pub struct FixtureRunner;

impl FixtureRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run all fixtures in a directory tree.
    pub fn run_all(&self, dir: &Path) -> Result<TestSummary, TestError> {
        let mut summary = TestSummary::new();

        if !dir.exists() {
            return Ok(summary);
        }

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        {
            let result = self.run_file(entry.path())?;
            summary.add(result);
        }

        Ok(summary)
    }

    /// Run a single fixture file.
    pub fn run_file(&self, path: &Path) -> Result<TestResult, TestError> {
        let name = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        debug!(?path, "Running layout fixture");
        let start = Instant::now();

        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => return Ok(TestResult::error(&name, 0, e.to_string())),
        };

        let doc: FixtureDoc = match serde_json::from_str(&json) {
            Ok(doc) => doc,
            Err(e) => return Ok(TestResult::error(&name, 0, e.to_string())),
        };

        let (mut tree, root) = match fixture::build_tree(&doc.root) {
            Ok(built) => built,
            Err(e) => return Ok(TestResult::error(&name, 0, e.to_string())),
        };

        tree.set_constraints(
            root,
            Constraints::exact(doc.viewport.width, doc.viewport.height),
        );
        let measure = HeuristicTextMeasure::default();
        tree.layout(root, &LayoutContext::new(&measure));

        let actual = format_layout(&tree, root);
        let duration = start.elapsed().as_millis() as u64;

        // A fixture without a golden file only checks that layout runs.
        let expected_path = path.with_extension("expected");
        if !expected_path.exists() {
            return Ok(TestResult::pass(&name, duration));
        }

        let expected = match fs::read_to_string(&expected_path) {
            Ok(expected) => expected,
            Err(e) => return Ok(TestResult::error(&name, duration, e.to_string())),
        };

        if expected.trim() == actual.trim() {
            Ok(TestResult::pass(&name, duration))
        } else {
            let diff = TextDiff::from_lines(expected.trim(), actual.trim())
                .unified_diff()
                .header("expected", "actual")
                .to_string();
            Ok(TestResult::fail_with_diff(&name, duration, diff))
        }
    }
}

/// Format the resolved geometry of a tree as an indented text dump.
pub fn format_layout(tree: &LayoutTree, root: NodeId) -> String {
    let mut output = String::new();
    format_box(tree, root, &mut output, 0);
    output
}

fn format_box(tree: &LayoutTree, id: NodeId, output: &mut String, indent: usize) {
    let Some(node) = tree.get(id) else { return };
    let prefix = "  ".repeat(indent);
    let geom = &node.geometry;

    let kind = if node.text().is_some() {
        "text"
    } else if node.children().is_empty() {
        "box"
    } else {
        "flex"
    };

    output.push_str(&format!(
        "{}{}: x={:.0} y={:.0} w={:.0} h={:.0}\n",
        prefix, kind, geom.x, geom.y, geom.width, geom.height
    ));

    for &child in node.children() {
        format_box(tree, child, output, indent + 1);
    }
}
