//! Runs the bundled fixtures against their golden files.

use std::path::Path;

use flexkit_test::{FixtureRunner, TestStatus};

#[test]
fn test_bundled_fixtures_pass() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    let runner = FixtureRunner::new();
    let summary = runner.run_all(&dir).expect("fixture run failed");

    assert!(summary.total >= 8, "expected bundled fixtures, found {}", summary.total);
    for result in &summary.results {
        assert_eq!(
            result.status,
            TestStatus::Pass,
            "{} failed:\n{}",
            result.name,
            result.message.as_deref().unwrap_or("")
        );
    }
}
