//! Explicit fix application.
//!
//! Fixes only run when a caller asks for them (`validate --fix`). The
//! engine itself never changes the project.

use std::panic::{self, AssertUnwindSafe};

use crate::rules::{Rule, RuleId, ValidationContext};

use super::executor::panic_message;
use super::report::ValidationReport;

/// Result of attempting fixes for a report.
#[derive(Debug, Default)]
pub struct FixResult {
    /// Rules whose fix changed something.
    pub fixed: Vec<RuleId>,
    /// Flagged rules without a fix, or whose fix had nothing to do.
    pub unfixable: Vec<RuleId>,
    /// Fixes that failed, with the error text.
    pub errors: Vec<(RuleId, String)>,
}

impl FixResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Applies the fix functions of rules flagged in a report.
#[derive(Debug, Default)]
pub struct FixEngine;

impl FixEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run the fix of every rule in `rules` that has findings in `report`.
    pub fn apply(
        &self,
        ctx: &ValidationContext,
        rules: &[&Rule],
        report: &ValidationReport,
    ) -> FixResult {
        let mut result = FixResult::default();

        for id in report.flagged_rules() {
            let Some(rule) = rules.iter().find(|r| &r.id == id) else {
                continue;
            };
            if !rule.supports_fix() {
                result.unfixable.push(id.clone());
                continue;
            }

            match panic::catch_unwind(AssertUnwindSafe(|| rule.fix(ctx))) {
                Ok(Ok(true)) => {
                    tracing::info!(rule = %id, "applied fix");
                    result.fixed.push(id.clone());
                }
                Ok(Ok(false)) => result.unfixable.push(id.clone()),
                Ok(Err(e)) => {
                    tracing::warn!(rule = %id, error = %e, "fix failed");
                    result.errors.push((id.clone(), format!("{:#}", e)));
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::warn!(rule = %id, error = %message, "fix failed");
                    result.errors.push((id.clone(), message));
                }
            }
        }

        result
    }
}
