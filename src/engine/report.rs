//! Validation results.

use serde::Serialize;

use crate::rules::{Finding, Rule, RuleId, RuleRef, Severity};

/// Per-rule counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Rules evaluated.
    pub total: usize,
    /// Rules with no findings.
    pub passed: usize,
    /// Rules whose findings were warnings, including rules that failed to run.
    pub warnings: usize,
    /// Rules whose findings were violations.
    pub violations: usize,
    /// `round(100 * passed / total)`, `0` for an empty run.
    pub score: u8,
}

impl Summary {
    fn score_for(passed: usize, total: usize) -> u8 {
        if total == 0 {
            return 0;
        }
        (100.0 * passed as f64 / total as f64).round() as u8
    }
}

/// The outcome of a validation run.
///
/// Built by the engine and handed back by value. There is no public way to
/// change it afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    violations: Vec<Finding>,
    warnings: Vec<Finding>,
    passed: Vec<RuleRef>,
    summary: Summary,
}

impl ValidationReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_pass(&mut self, rule: &Rule) {
        self.passed.push(rule.reference());
        self.summary.passed += 1;
        self.summary.total += 1;
    }

    /// Record a non-empty set of findings, classified by the rule's severity.
    pub(crate) fn record_findings(&mut self, rule: &Rule, findings: Vec<Finding>) {
        let stamped = findings.into_iter().map(|f| f.attributed_to(rule));
        if rule.severity == Severity::Error {
            self.violations.extend(stamped);
            self.summary.violations += 1;
        } else {
            self.warnings.extend(stamped);
            self.summary.warnings += 1;
        }
        self.summary.total += 1;
    }

    /// Record a check that returned an error or panicked.
    pub(crate) fn record_failure(&mut self, rule: &Rule, message: impl Into<String>) {
        let mut finding = Finding::new(message).attributed_to(rule);
        // Execution failures never block, whatever the rule's severity.
        if finding.severity == Severity::Error {
            finding.severity = Severity::Warning;
        }
        self.warnings.push(finding);
        self.summary.warnings += 1;
        self.summary.total += 1;
    }

    pub(crate) fn finish(mut self) -> Self {
        self.summary.score = Summary::score_for(self.summary.passed, self.summary.total);
        self
    }

    pub fn violations(&self) -> &[Finding] {
        &self.violations
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    /// Rules that produced no findings, in execution order.
    pub fn passed(&self) -> &[RuleRef] {
        &self.passed
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Process exit status for this report: `1` with violations, else `0`.
    pub fn exit_code(&self) -> i32 {
        if self.has_violations() {
            1
        } else {
            0
        }
    }

    /// Ids of rules with at least one finding, in first-seen order.
    pub fn flagged_rules(&self) -> Vec<&RuleId> {
        let mut ids: Vec<&RuleId> = Vec::new();
        for finding in self.violations.iter().chain(&self.warnings) {
            if !ids.contains(&&finding.rule_id) {
                ids.push(&finding.rule_id);
            }
        }
        ids
    }

    /// Findings attributed to `id`.
    pub fn findings_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.violations
            .iter()
            .chain(&self.warnings)
            .filter(move |f| f.rule_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Level, ValidationContext};

    fn rule(id: &str, severity: Severity) -> Rule {
        Rule::new(
            id,
            id,
            Level::new(1).unwrap(),
            "test",
            severity,
            |_: &ValidationContext| Ok(vec![]),
        )
    }

    #[test]
    fn empty_report_scores_zero() {
        let report = ValidationReport::new().finish();
        assert_eq!(report.summary().total, 0);
        assert_eq!(report.summary().score, 0);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn counts_are_per_rule() {
        let mut report = ValidationReport::new();
        report.record_findings(
            &rule("sec-001", Severity::Error),
            vec![Finding::new("a"), Finding::new("b")],
        );
        report.record_findings(&rule("qua-002", Severity::Info), vec![Finding::new("c")]);
        report.record_pass(&rule("doc-001", Severity::Warning));
        let report = report.finish();

        let summary = report.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.violations, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.score, 33);
        assert_eq!(report.violations().len(), 2);
        assert_eq!(report.violations()[1].rule_id, "sec-001");
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn failures_are_warnings_even_for_error_rules() {
        let mut report = ValidationReport::new();
        report.record_failure(&rule("tst-002", Severity::Error), "boom");
        let report = report.finish();
        assert!(!report.has_violations());
        assert_eq!(report.warnings()[0].severity, Severity::Warning);
        assert_eq!(report.warnings()[0].rule_id, "tst-002");
    }

    #[test]
    fn score_rounds_half_up() {
        assert_eq!(Summary::score_for(1, 2), 50);
        assert_eq!(Summary::score_for(2, 3), 67);
        assert_eq!(Summary::score_for(5, 5), 100);
    }

    #[test]
    fn flagged_rules_are_unique() {
        let mut report = ValidationReport::new();
        report.record_findings(
            &rule("doc-002", Severity::Info),
            vec![Finding::new("x"), Finding::new("y")],
        );
        let report = report.finish();
        assert_eq!(report.flagged_rules().len(), 1);
        assert_eq!(report.findings_for("doc-002").count(), 2);
    }
}
