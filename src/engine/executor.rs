//! Rule execution.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::rules::{Finding, Rule, ValidationContext};

use super::report::ValidationReport;

/// Prefix of the warning recorded when a check errors or panics.
pub const EXECUTION_FAILURE: &str = "Rule execution failed";

/// Runs rules against a context and classifies the results.
///
/// The engine does no I/O of its own. Everything a rule needs must already
/// be in the [`ValidationContext`].
#[derive(Debug, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `rules` level by level.
    ///
    /// Within a level rules keep the order they were given in. Rules
    /// switched off on the rule itself or in configuration are skipped and
    /// do not count toward the summary. A check that errors or panics is
    /// reported as a warning and the run continues.
    pub fn validate(&self, ctx: &ValidationContext, rules: &[&Rule]) -> ValidationReport {
        let mut ordered: Vec<&Rule> = rules.to_vec();
        ordered.sort_by_key(|r| r.level);

        let mut report = ValidationReport::new();
        for rule in ordered {
            if !rule.enabled || ctx.config().is_rule_disabled(rule.id.as_str()) {
                tracing::debug!(rule = %rule.id, "skipping disabled rule");
                continue;
            }

            match run_check(rule, ctx) {
                Ok(findings) if findings.is_empty() => {
                    tracing::debug!(rule = %rule.id, "passed");
                    report.record_pass(rule);
                }
                Ok(findings) => {
                    tracing::debug!(rule = %rule.id, findings = findings.len(), "failed");
                    report.record_findings(rule, findings);
                }
                Err(message) => {
                    tracing::warn!(rule = %rule.id, error = %message, "rule execution failed");
                    report.record_failure(rule, format!("{}: {}", EXECUTION_FAILURE, message));
                }
            }
        }

        report.finish()
    }
}

fn run_check(rule: &Rule, ctx: &ValidationContext) -> Result<Vec<Finding>, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.check(ctx))) {
        Ok(Ok(findings)) => Ok(findings),
        Ok(Err(e)) => Err(format!("{:#}", e)),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rules::{Level, Severity};
    use std::sync::{Arc, Mutex};

    fn rule(
        id: &str,
        level: u8,
        severity: Severity,
        check: impl Fn(&ValidationContext) -> anyhow::Result<Vec<Finding>> + Send + Sync + 'static,
    ) -> Rule {
        Rule::new(id, id, Level::new(level).unwrap(), "test", severity, check)
    }

    fn pass(id: &str, level: u8) -> Rule {
        rule(id, level, Severity::Error, |_| Ok(vec![]))
    }

    #[test]
    fn runs_by_level_keeping_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let make = |id: &'static str, level: u8| {
            let seen = seen.clone();
            rule(id, level, Severity::Info, move |_| {
                seen.lock().unwrap().push(id);
                Ok(vec![])
            })
        };
        let rules = [make("c-003", 3), make("a-001", 1), make("b-003", 3), make("d-002", 2)];
        let refs: Vec<&Rule> = rules.iter().collect();

        let report = ValidationEngine::new().validate(&ValidationContext::for_tests(), &refs);
        assert_eq!(*seen.lock().unwrap(), vec!["a-001", "d-002", "c-003", "b-003"]);
        let passed: Vec<&str> = report.passed().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(passed, vec!["a-001", "d-002", "c-003", "b-003"]);
    }

    #[test]
    fn severity_decides_classification() {
        let rules = [
            rule("sec-001", 1, Severity::Error, |_| Ok(vec![Finding::new("leak")])),
            rule("qua-002", 5, Severity::Info, |_| Ok(vec![Finding::new("todo")])),
            pass("doc-001", 4),
        ];
        let refs: Vec<&Rule> = rules.iter().collect();
        let report = ValidationEngine::new().validate(&ValidationContext::for_tests(), &refs);

        assert_eq!(report.violations().len(), 1);
        assert_eq!(report.violations()[0].rule_id, "sec-001");
        assert_eq!(report.violations()[0].severity, Severity::Error);
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].severity, Severity::Info);

        let s = report.summary();
        assert_eq!(s.total, 3);
        assert_eq!(s.passed + s.warnings + s.violations, s.total);
    }

    #[test]
    fn failing_check_does_not_stop_later_rules() {
        let rules = [
            rule("tst-002", 1, Severity::Error, |_| anyhow::bail!("summary unreadable")),
            pass("doc-001", 2),
        ];
        let refs: Vec<&Rule> = rules.iter().collect();
        let report = ValidationEngine::new().validate(&ValidationContext::for_tests(), &refs);

        assert!(report.violations().is_empty());
        assert_eq!(report.warnings().len(), 1);
        assert!(report.warnings()[0].message.starts_with(EXECUTION_FAILURE));
        assert!(report.warnings()[0].message.contains("summary unreadable"));
        assert_eq!(report.passed().len(), 1);
    }

    #[test]
    fn panicking_check_becomes_warning() {
        let rules = [
            rule("qua-001", 1, Severity::Warning, |_| panic!("index out of range")),
            pass("doc-001", 1),
        ];
        let refs: Vec<&Rule> = rules.iter().collect();
        let report = ValidationEngine::new().validate(&ValidationContext::for_tests(), &refs);

        assert_eq!(report.warnings().len(), 1);
        assert!(report.warnings()[0].message.contains("index out of range"));
        assert_eq!(report.summary().total, 2);
    }

    #[test]
    fn disabled_rules_are_not_counted() {
        let mut config = Config::default();
        config.disable_rule("cmt-002");
        let ctx = ValidationContext::new("/p", config);
        let rules = [
            rule("cmt-002", 2, Severity::Warning, |_| Ok(vec![Finding::new("long")])),
            pass("cmt-001", 2).with_enabled(false),
            pass("sec-001", 1),
        ];
        let refs: Vec<&Rule> = rules.iter().collect();
        let report = ValidationEngine::new().validate(&ctx, &refs);

        assert_eq!(report.summary().total, 1);
        assert_eq!(report.summary().score, 100);
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn no_rules_scores_zero() {
        let report = ValidationEngine::new().validate(&ValidationContext::for_tests(), &[]);
        assert_eq!(report.summary().total, 0);
        assert_eq!(report.summary().score, 0);
    }
}
