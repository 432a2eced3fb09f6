//! Layout inspection tool for the FlexKit engine.
//!
//! Provides commands for:
//! - Dumping the resolved geometry of a single fixture
//! - Running a fixture directory against its golden files
//!
//! ## Usage
//!
//! ```bash
//! # Print the laid-out geometry of one fixture
//! layout-dump dump crates/flexkit-test/fixtures/basic-row.json
//!
//! # Run all fixtures and write a JSON report
//! layout-dump check crates/flexkit-test/fixtures --report report.json
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use flexkit_common::{init_logging, FlexError, LogConfig, OptionExt, ResultExt};
use flexkit_layout::{Constraints, HeuristicTextMeasure, LayoutContext};
use flexkit_test::{build_tree, format_layout, FixtureDoc, FixtureRunner, TestStatus};

#[derive(Parser)]
#[command(name = "layout-dump")]
#[command(about = "Layout inspection tool for the FlexKit engine")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the laid-out geometry of one fixture
    Dump {
        /// Fixture JSON file
        fixture: PathBuf,
    },

    /// Run all fixtures in a directory against their golden files
    Check {
        /// Fixtures directory
        #[arg(default_value = "crates/flexkit-test/fixtures")]
        dir: PathBuf,
        /// Output JSON report path
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(if cli.verbose {
        LogConfig::debug()
    } else {
        LogConfig::default()
    });

    let result = match cli.command {
        Commands::Dump { fixture } => dump(&fixture),
        Commands::Check { dir, report } => check(&dir, report.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error[{}]: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn dump(path: &Path) -> flexkit_common::Result<()> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_not_found(path.display().to_string())?;

    let json = std::fs::read_to_string(path)?;
    let doc: FixtureDoc = serde_json::from_str(&json).context("parsing fixture")?;
    let (mut tree, root) = build_tree(&doc.root).context("building layout tree")?;

    tree.set_constraints(
        root,
        Constraints::exact(doc.viewport.width, doc.viewport.height),
    );
    let measure = HeuristicTextMeasure::default();
    tree.layout(root, &LayoutContext::new(&measure));

    println!("{}:", doc.name.as_deref().unwrap_or(stem));
    print!("{}", format_layout(&tree, root));
    Ok(())
}

fn check(dir: &Path, report: Option<&Path>) -> flexkit_common::Result<()> {
    let runner = FixtureRunner::new();
    let summary = runner
        .run_all(dir)
        .map_err(|e| FlexError::layout_with_source("fixture run failed", e))?;

    if summary.total == 0 {
        return Err(FlexError::NotFound(format!(
            "no fixtures under {}",
            dir.display()
        )));
    }

    println!("Fixture results:");
    println!("  Total:  {}", summary.total);
    println!("  Passed: {}", summary.passed);
    println!("  Failed: {}", summary.failed);
    println!("  Errors: {}", summary.errors);

    for result in &summary.results {
        if result.status != TestStatus::Pass {
            println!();
            println!("--- {} ---", result.name);
            if let Some(message) = &result.message {
                println!("{message}");
            }
        }
    }

    if let Some(report_path) = report {
        let json = serde_json::to_string_pretty(&summary).context("serializing report")?;
        std::fs::write(report_path, json)?;
        println!("Report written to: {}", report_path.display());
    }

    if !summary.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
