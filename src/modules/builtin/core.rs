//! The `core` module: secrets, commit messages and the README.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{file_name_lower, PatternCheck};
use crate::error::Result;
use crate::hooks::HookEvent;
use crate::modules::module::{ModuleRegistrar, RuleModule};
use crate::rules::{Finding, ValidationContext};
use crate::scanner::{secret_patterns, PatternMatch};

static CONVENTIONAL_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(feat|fix|docs|style|refactor|perf|test|build|ci|chore|revert)(\([\w\-./ ]+\))?!?: .+")
        .unwrap()
});

const DEFAULT_SUBJECT_LENGTH: u64 = 72;

const README_NAMES: [&str; 4] = ["README.md", "README", "README.rst", "README.txt"];

const ENV_TEMPLATES: [&str; 3] = [".env.example", ".env.sample", ".env.template"];

const KEY_EXTENSIONS: [&str; 4] = ["pem", "key", "p12", "pfx"];

const KEY_FILE_NAMES: [&str; 4] = ["id_rsa", "id_dsa", "id_ecdsa", "id_ed25519"];

const LOCKFILE_NAMES: [&str; 5] = [
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "cargo.lock",
    "gemfile.lock",
];

/// Secrets, commit conventions and the project README.
pub struct CoreModule;

impl RuleModule for CoreModule {
    fn name(&self) -> &str {
        "core"
    }

    fn description(&self) -> &str {
        "Secret detection, commit conventions and project README"
    }

    fn initialize(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<()> {
        registrar.register_catalogued_check("sec-001", secret_check())?;
        registrar.register_catalogued("sec-002", check_env_files)?;
        registrar.register_catalogued("sec-003", check_key_files)?;
        registrar.register_catalogued("cmt-001", check_commit_format)?;
        registrar.register_catalogued("cmt-002", check_subject_length)?;
        registrar.register_catalogued("doc-001", check_readme)?;

        let secrets = secret_check();
        registrar.register_hook(HookEvent::PreCommit, "secret-scan", move |ctx| {
            if ctx.config().is_rule_disabled("sec-001") {
                return Ok(true);
            }
            let matches = secrets.staged_matches(ctx);
            for m in &matches {
                tracing::warn!(
                    file = %m.file.display(),
                    line = m.line,
                    pattern = %m.pattern,
                    "possible secret in staged file"
                );
            }
            Ok(matches.is_empty())
        });

        registrar.register_hook(HookEvent::CommitMsg, "commit-format", |ctx| {
            let Some(message) = ctx.commit_message() else {
                return Ok(true);
            };
            if ctx.config().is_rule_disabled("cmt-001") {
                return Ok(true);
            }
            let subject = message.lines().next().unwrap_or("");
            let ok = !violates_conventional_format(subject);
            if !ok {
                tracing::warn!(subject, "commit message does not follow type(scope): description");
            }
            Ok(ok)
        });

        Ok(())
    }
}

fn secret_check() -> PatternCheck {
    PatternCheck::new(secret_patterns(), is_scannable_for_secrets, secret_message)
}

fn is_scannable_for_secrets(path: &Path) -> bool {
    !LOCKFILE_NAMES.contains(&file_name_lower(path).as_str())
}

fn secret_message(m: &PatternMatch) -> String {
    format!("Possible hardcoded secret ({})", m.pattern.replace('_', " "))
}

/// Whether a commit subject breaks the conventional format.
///
/// Merge and revert subjects generated by git are exempt.
pub(crate) fn violates_conventional_format(subject: &str) -> bool {
    if subject.starts_with("Merge ") || subject.starts_with("Revert \"") {
        return false;
    }
    !CONVENTIONAL_COMMIT.is_match(subject)
}

/// Subjects to check: the message being committed, or else recent history.
fn subjects(ctx: &ValidationContext) -> Vec<(Option<String>, String)> {
    match ctx.commit_message() {
        Some(message) => vec![(None, message.lines().next().unwrap_or("").to_string())],
        None => ctx
            .commits()
            .iter()
            .map(|c| (Some(c.short_hash().to_string()), c.subject().to_string()))
            .collect(),
    }
}

fn describe(hash: &Option<String>) -> String {
    match hash {
        Some(hash) => format!("Commit {}", hash),
        None => "Commit message".to_string(),
    }
}

fn check_env_files(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    Ok(ctx
        .files()
        .iter()
        .filter(|f| {
            let name = f.file_name_lower();
            (name == ".env" || name.starts_with(".env.")) && !ENV_TEMPLATES.contains(&name.as_str())
        })
        .map(|f| {
            Finding::new(format!(
                "Environment file {} is committed; add it to .gitignore",
                f.path.display()
            ))
            .in_file(&f.path)
        })
        .collect())
}

fn check_key_files(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    Ok(ctx
        .files()
        .iter()
        .filter(|f| {
            let name = f.file_name_lower();
            let ext_match = f
                .path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| KEY_EXTENSIONS.contains(&e.to_lowercase().as_str()));
            ext_match || KEY_FILE_NAMES.contains(&name.as_str())
        })
        .map(|f| Finding::new("Private key file is committed").in_file(&f.path))
        .collect())
}

fn check_commit_format(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    Ok(subjects(ctx)
        .into_iter()
        .filter(|(_, subject)| violates_conventional_format(subject))
        .map(|(hash, subject)| {
            Finding::new(format!(
                "{} does not follow type(scope): description: '{}'",
                describe(&hash),
                subject
            ))
        })
        .collect())
}

fn check_subject_length(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    let max = ctx
        .config()
        .rule_option_u64("cmt-002", "maxLength", DEFAULT_SUBJECT_LENGTH) as usize;
    Ok(subjects(ctx)
        .into_iter()
        .filter(|(_, subject)| subject.chars().count() > max)
        .map(|(hash, subject)| {
            Finding::new(format!(
                "{} subject is {} characters (max {})",
                describe(&hash),
                subject.chars().count(),
                max
            ))
        })
        .collect())
}

fn check_readme(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    if ctx.has_root_file(&README_NAMES) {
        Ok(vec![])
    } else {
        Ok(vec![Finding::new("No README found in the project root")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookDispatcher;
    use crate::modules::builtin::test_support::{config_with, registry, run_rule};
    use crate::rules::{CommitInfo, ProjectFile};
    use std::path::PathBuf;

    fn ctx() -> ValidationContext {
        ValidationContext::new("/project", config_with(&["sec-001", "cmt-001"]))
    }

    #[test]
    fn conventional_format() {
        assert!(!violates_conventional_format("feat: add login"));
        assert!(!violates_conventional_format("fix(api)!: drop v1"));
        assert!(!violates_conventional_format("Merge branch 'main'"));
        assert!(violates_conventional_format("added stuff"));
        assert!(violates_conventional_format("feat:missing space"));
    }

    #[test]
    fn secrets_are_reported_with_location() {
        let ctx = ctx().with_files(vec![
            ProjectFile::new("src/config.js", "\nconst api_key = \"sk-1234567890abcdef\";\n"),
            ProjectFile::new("package-lock.json", "\"token\": \"abcdefghijklmnopqrstuvwx\""),
        ]);
        let report = run_rule("core", "sec-001", &ctx);
        assert_eq!(report.violations().len(), 1);
        let finding = &report.violations()[0];
        assert_eq!(finding.file, Some(PathBuf::from("src/config.js")));
        assert_eq!(finding.line, Some(2));
        assert!(!finding.message.contains("sk-123"));
    }

    #[test]
    fn env_files_except_templates() {
        let ctx = ctx().with_files(vec![
            ProjectFile::new(".env", "A=1"),
            ProjectFile::new("web/.env.local", "A=1"),
            ProjectFile::new(".env.example", "A="),
        ]);
        let report = run_rule("core", "sec-002", &ctx);
        assert_eq!(report.violations().len(), 2);
    }

    #[test]
    fn key_files() {
        let ctx = ctx().with_files(vec![
            ProjectFile::new("certs/server.pem", ""),
            ProjectFile::new("id_rsa", ""),
            ProjectFile::new("id_rsa.pub", ""),
        ]);
        let report = run_rule("core", "sec-003", &ctx);
        assert_eq!(report.violations().len(), 2);
    }

    #[test]
    fn commit_history_is_checked() {
        let ctx = ctx().with_commits(vec![
            CommitInfo::new("aaaaaaaaaa", "feat: fine"),
            CommitInfo::new("bbbbbbbbbb", "wip"),
        ]);
        let report = run_rule("core", "cmt-001", &ctx);
        assert_eq!(report.violations().len(), 1);
        assert!(report.violations()[0].message.starts_with("Commit bbbbbbb"));
    }

    #[test]
    fn pending_message_takes_precedence_over_history() {
        let ctx = ctx()
            .with_commits(vec![CommitInfo::new("bbbbbbbbbb", "wip")])
            .with_commit_message("feat: pending\n\nbody");
        let report = run_rule("core", "cmt-001", &ctx);
        assert!(report.violations().is_empty());
    }

    #[test]
    fn subject_length_uses_option() {
        let mut config = config_with(&["cmt-002"]);
        config.rules.get_mut("cmt-002").unwrap().options = Some(
            [("maxLength".to_string(), serde_json::json!(10))]
                .into_iter()
                .collect(),
        );
        let ctx = ValidationContext::new("/p", config).with_commit_message("feat: a long subject");
        let report = run_rule("core", "cmt-002", &ctx);
        assert_eq!(report.warnings().len(), 1);
        assert!(report.warnings()[0].message.contains("max 10"));
    }

    #[test]
    fn readme_at_root() {
        let missing = ctx().with_files(vec![ProjectFile::new("docs/README.md", "")]);
        assert_eq!(run_rule("core", "doc-001", &missing).warnings().len(), 1);

        let present = ctx().with_files(vec![ProjectFile::new("readme.md", "")]);
        assert!(run_rule("core", "doc-001", &present).warnings().is_empty());
    }

    #[test]
    fn pre_commit_hook_rejects_staged_secrets() {
        let registry = registry(&["core"]);
        let ctx = ctx()
            .with_files(vec![
                ProjectFile::new("a.js", "password = \"hunter2hunter2\""),
                ProjectFile::new("b.js", "ok"),
            ])
            .with_staged_files(vec![PathBuf::from("b.js")]);
        let outcome = HookDispatcher::new(&registry).dispatch(HookEvent::PreCommit, &ctx);
        assert!(outcome.accepted);

        let staged = ctx.with_staged_files(vec![PathBuf::from("a.js")]);
        let outcome = HookDispatcher::new(&registry).dispatch(HookEvent::PreCommit, &staged);
        assert!(!outcome.accepted);
        assert_eq!(outcome.rejected_by.as_deref(), Some("core"));
    }

    #[test]
    fn commit_msg_hook_checks_format() {
        let registry = registry(&["core"]);
        let bad = ctx().with_commit_message("did things");
        assert!(!HookDispatcher::new(&registry).dispatch(HookEvent::CommitMsg, &bad).accepted);
        let good = ctx().with_commit_message("chore: tidy");
        assert!(HookDispatcher::new(&registry).dispatch(HookEvent::CommitMsg, &good).accepted);
    }
}
