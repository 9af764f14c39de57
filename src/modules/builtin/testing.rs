//! The `testing` module: test presence, coverage threshold and focused tests.

use std::fs;
use std::path::Path;

use anyhow::Context as _;
use serde_json::Value;

use super::PatternCheck;
use crate::error::Result;
use crate::hooks::HookEvent;
use crate::modules::module::{ModuleRegistrar, RuleModule};
use crate::rules::{Finding, ValidationContext};
use crate::scanner::{estimate_coverage, focused_test_patterns, is_test_file, PatternMatch};

const DEFAULT_THRESHOLD: u64 = 80;

/// Istanbul / c8 style summary, relative to the project root.
const COVERAGE_SUMMARY: &str = "coverage/coverage-summary.json";

/// Tests for source files, coverage threshold, focused tests.
pub struct TestingModule;

impl RuleModule for TestingModule {
    fn name(&self) -> &str {
        "testing"
    }

    fn description(&self) -> &str {
        "Test presence, coverage threshold and focused or skipped tests"
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["core".to_string()]
    }

    fn initialize(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<()> {
        registrar.register_catalogued("tst-001", check_untested_sources)?;
        registrar.register_catalogued("tst-002", check_coverage_threshold)?;
        registrar.register_catalogued_check("tst-003", focused_check())?;

        let focused = focused_check();
        registrar.register_hook(HookEvent::PrePush, "focused-tests", move |ctx| {
            if ctx.config().is_rule_disabled("tst-003") {
                return Ok(true);
            }
            let matches = focused.matches(ctx);
            for m in &matches {
                tracing::warn!(file = %m.file.display(), line = m.line, "focused or skipped test");
            }
            Ok(matches.is_empty())
        });

        registrar.register_validator("coverage", coverage_summary);

        Ok(())
    }
}

fn focused_check() -> PatternCheck {
    PatternCheck::new(focused_test_patterns(), is_test_file, focused_message)
}

fn focused_message(m: &PatternMatch) -> String {
    format!("Focused or skipped test ({})", m.matched.trim())
}

fn check_untested_sources(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    Ok(estimate_coverage(ctx.files())
        .untested
        .iter()
        .map(|path| Finding::new("No test file found for this source file").in_file(path))
        .collect())
}

/// Line coverage from a coverage summary file, if one exists.
fn reported_coverage(root: &Path) -> anyhow::Result<Option<f64>> {
    let path = root.join(COVERAGE_SUMMARY);
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let summary: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(summary
        .pointer("/total/lines/pct")
        .and_then(Value::as_f64))
}

fn check_coverage_threshold(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    let threshold = ctx
        .config()
        .rule_option_u64("tst-002", "threshold", DEFAULT_THRESHOLD) as f64;

    let (coverage, source) = match reported_coverage(ctx.project_root())? {
        Some(pct) => (pct, "reported"),
        None => (estimate_coverage(ctx.files()).exact_percentage(), "estimated"),
    };

    if coverage >= threshold {
        Ok(vec![])
    } else {
        Ok(vec![Finding::new(format!(
            "Coverage ({}) is {:.1}%, below the {}% threshold",
            source, coverage, threshold
        ))])
    }
}

fn coverage_summary(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    let estimate = estimate_coverage(ctx.files());
    Ok(vec![Finding::new(format!(
        "Estimated coverage {}%: {} of {} source files have tests ({} test files)",
        estimate.percentage,
        estimate.source_files - estimate.untested.len(),
        estimate.source_files,
        estimate.test_files
    ))])
}
