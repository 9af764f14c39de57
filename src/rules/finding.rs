//! Findings produced by rule checks.
//!
//! A [`Finding`] is one concrete instance of a rule failing, with an
//! optional source location. Findings live for a single validation run.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::rule::{Rule, RuleId, Severity};

/// A single issue reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// File the issue was found in, relative to the project root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// 1-based line number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Human-readable message.
    pub message: String,
    /// Rule that produced this finding.
    pub rule_id: RuleId,
    /// Severity of the producing rule.
    pub severity: Severity,
}

impl Finding {
    /// Create a finding with no location.
    ///
    /// The rule id and severity are filled in by the engine from the rule
    /// that returned it.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            message: message.into(),
            rule_id: RuleId::default(),
            severity: Severity::Info,
        }
    }

    /// Attach a file.
    pub fn in_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(file.as_ref().to_path_buf());
        self
    }

    /// Attach a file and 1-based line.
    pub fn at(mut self, file: impl AsRef<Path>, line: usize) -> Self {
        self.file = Some(file.as_ref().to_path_buf());
        self.line = Some(line);
        self
    }

    /// Stamp the producing rule's id and severity onto this finding.
    pub fn attributed_to(mut self, rule: &Rule) -> Self {
        self.rule_id = rule.id.clone();
        self.severity = rule.severity;
        self
    }

    /// `file:line` style location, if any.
    pub fn location(&self) -> Option<String> {
        let file = self.file.as_ref()?;
        Some(match self.line {
            Some(line) => format!("{}:{}", file.display(), line),
            None => file.display().to_string(),
        })
    }
}
