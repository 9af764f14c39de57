//! Human-readable report output.

use std::io::Write;

use super::ReportFormatter;
use crate::engine::ValidationReport;
use crate::rules::Finding;
use crate::ui::Theme;

/// Formats a report for terminal display.
pub struct HumanFormatter {
    theme: Theme,
}

impl HumanFormatter {
    pub fn new(use_color: bool) -> Self {
        Self {
            theme: Theme::for_color(use_color),
        }
    }

    fn write_finding<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        label: &str,
        finding: &Finding,
    ) -> std::io::Result<()> {
        let styled_label = match label {
            "error" => self.theme.error.apply_to(label),
            _ => self.theme.warning.apply_to(label),
        };
        writeln!(
            writer,
            "{}[{}]: {}",
            styled_label,
            self.theme.info.apply_to(&finding.rule_id),
            finding.message
        )?;
        if let Some(location) = finding.location() {
            writeln!(writer, "  {} {}", self.theme.dim.apply_to("-->"), location)?;
        }
        Ok(())
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write + ?Sized>(
        &self,
        report: &ValidationReport,
        writer: &mut W,
    ) -> std::io::Result<()> {
        for finding in report.violations() {
            self.write_finding(writer, "error", finding)?;
        }
        for finding in report.warnings() {
            self.write_finding(writer, &finding.severity.to_string(), finding)?;
        }
        if !report.violations().is_empty() || !report.warnings().is_empty() {
            writeln!(writer)?;
        }

        let summary = report.summary();
        let line = format!(
            "{} rules: {} passed, {} warnings, {} violations (score {}%)",
            summary.total, summary.passed, summary.warnings, summary.violations, summary.score
        );
        let line = if summary.violations > 0 {
            self.theme.format_error(&line)
        } else if summary.warnings > 0 {
            self.theme.format_warning(&line)
        } else {
            self.theme.format_success(&line)
        };
        writeln!(writer, "{}", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ValidationEngine;
    use crate::rules::{Level, Rule, Severity, ValidationContext};

    fn render(rules: &[Rule]) -> String {
        let refs: Vec<&Rule> = rules.iter().collect();
        let report = ValidationEngine::new().validate(&ValidationContext::for_tests(), &refs);
        let mut output = Vec::new();
        HumanFormatter::new(false).format(&report, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn formats_violation_with_location() {
        let output = render(&[Rule::new(
            "sec-001",
            "No secrets",
            Level::new(1).unwrap(),
            "security",
            Severity::Error,
            |_: &ValidationContext| Ok(vec![Finding::new("API key").at("src/app.js", 3)]),
        )]);
        assert!(output.contains("error[sec-001]: API key"));
        assert!(output.contains("--> src/app.js:3"));
        assert!(output.contains("✗ 1 rules: 0 passed, 0 warnings, 1 violations (score 0%)"));
    }

    #[test]
    fn info_findings_are_labelled_info() {
        let output = render(&[Rule::new(
            "qua-002",
            "TODOs",
            Level::new(5).unwrap(),
            "quality",
            Severity::Info,
            |_: &ValidationContext| Ok(vec![Finding::new("TODO marker")]),
        )]);
        assert!(output.contains("info[qua-002]: TODO marker"));
        assert!(output.contains("⚠ 1 rules"));
    }

    #[test]
    fn clean_run_is_success() {
        let output = render(&[]);
        assert_eq!(output, "✓ 0 rules: 0 passed, 0 warnings, 0 violations (score 0%)\n");
    }
}
