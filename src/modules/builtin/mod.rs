//! Built-in rule modules.
//!
//! | Module            | Depends on | Rules                              |
//! |-------------------|------------|------------------------------------|
//! | `core`            |            | sec-001..003, cmt-001..002, doc-001 |
//! | `github-workflow` | core       | wfl-001..003                       |
//! | `testing`         | core       | tst-001..003                       |
//! | `documentation`   | core       | doc-002, doc-003                   |
//! | `quality`         | core       | qua-001, qua-002                   |
//! | `deployment`      | core       | dep-001, dep-002                   |

mod core;
mod deployment;
mod documentation;
mod quality;
mod testing;
mod workflow;

use std::path::Path;

use crate::modules::module::RuleModule;
use crate::rules::{Finding, RuleCheck, ValidationContext};
use crate::scanner::{scan_content, NamedPattern, PatternMatch};

pub use self::core::CoreModule;
pub use deployment::DeploymentModule;
pub use documentation::DocumentationModule;
pub use quality::QualityModule;
pub use testing::TestingModule;
pub use workflow::WorkflowModule;

/// Every built-in module, in registration order.
pub fn all() -> Vec<Box<dyn RuleModule>> {
    vec![
        Box::new(CoreModule),
        Box::new(WorkflowModule),
        Box::new(TestingModule),
        Box::new(DocumentationModule),
        Box::new(QualityModule),
        Box::new(DeploymentModule),
    ]
}

/// Reports every match of a pattern set in the files it applies to.
pub(crate) struct PatternCheck {
    patterns: Vec<NamedPattern>,
    applies_to: fn(&Path) -> bool,
    message: fn(&PatternMatch) -> String,
}

impl PatternCheck {
    pub(crate) fn new(
        patterns: Vec<NamedPattern>,
        applies_to: fn(&Path) -> bool,
        message: fn(&PatternMatch) -> String,
    ) -> Self {
        Self {
            patterns,
            applies_to,
            message,
        }
    }

    /// Raw matches over the full file listing.
    pub(crate) fn matches(&self, ctx: &ValidationContext) -> Vec<PatternMatch> {
        ctx.files()
            .iter()
            .filter(|f| (self.applies_to)(&f.path))
            .flat_map(|f| scan_content(&f.path, &f.content, &self.patterns))
            .collect()
    }

    /// Raw matches over staged files only.
    pub(crate) fn staged_matches(&self, ctx: &ValidationContext) -> Vec<PatternMatch> {
        ctx.staged()
            .filter(|f| (self.applies_to)(&f.path))
            .flat_map(|f| scan_content(&f.path, &f.content, &self.patterns))
            .collect()
    }
}

impl RuleCheck for PatternCheck {
    fn check(&self, ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
        Ok(self
            .matches(ctx)
            .iter()
            .map(|m| m.to_finding((self.message)(m)))
            .collect())
    }
}

/// Lowercased final path component.
pub(crate) fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
