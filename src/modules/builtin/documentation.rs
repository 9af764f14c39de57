//! The `documentation` module: CHANGELOG, LICENSE and README sections.

use std::fs;

use anyhow::Context as _;

use crate::error::Result;
use crate::modules::module::{ModuleRegistrar, RuleModule};
use crate::rules::{Finding, ValidationContext};

const CHANGELOG_NAMES: [&str; 4] = ["CHANGELOG.md", "CHANGELOG", "HISTORY.md", "CHANGES.md"];

const LICENSE_NAMES: [&str; 4] = ["LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING"];

const README_SECTIONS: [&str; 2] = ["installation", "usage"];

const CHANGELOG_TEMPLATE: &str = "# Changelog\n\n\
All notable changes to this project will be documented in this file.\n\n\
## [Unreleased]\n";

/// Project-level documentation files.
pub struct DocumentationModule;

impl RuleModule for DocumentationModule {
    fn name(&self) -> &str {
        "documentation"
    }

    fn description(&self) -> &str {
        "CHANGELOG and LICENSE presence, README structure"
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["core".to_string()]
    }

    fn initialize(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<()> {
        registrar.register_catalogued_with_fix("doc-002", check_changelog, create_changelog)?;
        registrar.register_catalogued("doc-003", check_license)?;
        registrar.register_validator("readme-sections", check_readme_sections);
        Ok(())
    }
}

fn check_changelog(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    if ctx.has_root_file(&CHANGELOG_NAMES) {
        Ok(vec![])
    } else {
        Ok(vec![Finding::new("No CHANGELOG found in the project root")])
    }
}

/// Write a skeleton `CHANGELOG.md`. Does nothing when one exists on disk.
fn create_changelog(ctx: &ValidationContext) -> anyhow::Result<bool> {
    let path = ctx.project_root().join("CHANGELOG.md");
    if path.exists() {
        return Ok(false);
    }
    fs::write(&path, CHANGELOG_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "created changelog");
    Ok(true)
}

fn check_license(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    if ctx.has_root_file(&LICENSE_NAMES) {
        Ok(vec![])
    } else {
        Ok(vec![Finding::new("No LICENSE found in the project root")])
    }
}

fn check_readme_sections(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    let Some(readme) = ctx
        .files()
        .iter()
        .find(|f| f.is_root_level() && f.file_name_lower().starts_with("readme"))
    else {
        return Ok(vec![Finding::new("No README found in the project root")]);
    };

    let headings: Vec<String> = readme
        .content
        .lines()
        .filter(|l| l.trim_start().starts_with('#'))
        .map(|l| l.to_lowercase())
        .collect();

    Ok(README_SECTIONS
        .iter()
        .filter(|section| !headings.iter().any(|h| h.contains(*section)))
        .map(|section| {
            Finding::new(format!("README has no '{}' section", section)).in_file(&readme.path)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FixEngine;
    use crate::modules::builtin::test_support::{config_with, registry, run_rule};
    use crate::rules::ProjectFile;
    use tempfile::TempDir;

    #[test]
    fn changelog_and_license() {
        let ctx = ValidationContext::new("/p", config_with(&["doc-002", "doc-003"]))
            .with_files(vec![ProjectFile::new("HISTORY.md", ""), ProjectFile::new("src/LICENSE", "")]);
        assert!(run_rule("documentation", "doc-002", &ctx).warnings().is_empty());
        assert_eq!(run_rule("documentation", "doc-003", &ctx).warnings().len(), 1);
    }

    #[test]
    fn fix_creates_changelog_once() {
        let temp = TempDir::new().unwrap();
        let ctx = ValidationContext::new(temp.path(), config_with(&["doc-002"]));
        let registry = registry(&["documentation"]);
        let rules: Vec<_> = registry
            .all_rules()
            .into_iter()
            .filter(|r| r.id == "doc-002")
            .collect();
        let report = run_rule("documentation", "doc-002", &ctx);

        let result = FixEngine::new().apply(&ctx, &rules, &report);
        assert_eq!(result.fixed.len(), 1);
        let written = fs::read_to_string(temp.path().join("CHANGELOG.md")).unwrap();
        assert!(written.starts_with("# Changelog"));

        assert!(!rules[0].fix(&ctx).unwrap());
    }

    #[test]
    fn readme_sections_validator() {
        let registry = registry(&["documentation"]);
        let ctx = ValidationContext::new("/p", config_with(&[])).with_files(vec![ProjectFile::new(
            "README.md",
            "# Tool\n\n## Installation\n\ncargo install tool\n",
        )]);
        let findings = registry.run_validator("readme-sections", &ctx).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("usage"));
    }

    #[test]
    fn readme_sections_without_readme() {
        let registry = registry(&["documentation"]);
        let ctx = ValidationContext::new("/p", config_with(&[]));
        let findings = registry.run_validator("readme-sections", &ctx).unwrap();
        assert_eq!(findings.len(), 1);
    }
}
