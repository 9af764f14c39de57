//! The `github-workflow` module: branch names, issue links and PR descriptions.

use std::sync::LazyLock;

use anyhow::Context as _;
use regex::Regex;

use crate::error::Result;
use crate::hooks::HookEvent;
use crate::modules::module::{ModuleRegistrar, RuleModule};
use crate::rules::{Finding, ValidationContext};

const DEFAULT_BRANCH_PATTERN: &str =
    r"^(feature|fix|bugfix|hotfix|release|chore|docs|refactor|test)/[a-z0-9._-]+$";

const PROTECTED_BRANCHES: [&str; 3] = ["main", "master", "develop"];

const DEFAULT_PR_MIN_LENGTH: u64 = 20;

static BRANCH_ISSUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[/_-])#?(\d+)(?:[/_-]|$)").unwrap());

static TEXT_ISSUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:#\d+\b|\b(?:closes|fixes|resolves|refs)\s+[\w./-]*#?\d+\b)").unwrap()
});

const LOCKFILES: [&str; 5] = [
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "Gemfile.lock",
];

/// Branch naming, issue tracking and pull request hygiene.
pub struct WorkflowModule;

impl RuleModule for WorkflowModule {
    fn name(&self) -> &str {
        "github-workflow"
    }

    fn description(&self) -> &str {
        "Branch naming, issue references and pull request descriptions"
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["core".to_string()]
    }

    fn initialize(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<()> {
        registrar.register_catalogued("wfl-001", check_branch_name)?;
        registrar.register_catalogued("wfl-002", check_issue_reference)?;
        registrar.register_catalogued("wfl-003", check_pr_description)?;

        registrar.register_hook(HookEvent::PrePush, "branch-naming", |ctx| {
            if ctx.config().is_rule_disabled("wfl-001") {
                return Ok(true);
            }
            let findings = check_branch_name(ctx)?;
            for finding in &findings {
                tracing::warn!("{}", finding.message);
            }
            Ok(findings.is_empty())
        });

        registrar.register_hook(HookEvent::PostMerge, "lockfile-notice", |ctx| {
            if ctx.has_root_file(&LOCKFILES) {
                tracing::info!("merge complete; reinstall dependencies if the lockfile changed");
            }
            Ok(true)
        });

        registrar.register_validator("branch-name", check_branch_name);

        Ok(())
    }
}

fn branch_pattern(ctx: &ValidationContext) -> &str {
    ctx.config()
        .rule_option_str("wfl-001", "pattern")
        .unwrap_or(DEFAULT_BRANCH_PATTERN)
}

fn check_branch_name(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    let Some(branch) = ctx.branch() else {
        return Ok(vec![]);
    };
    if PROTECTED_BRANCHES.contains(&branch) {
        return Ok(vec![]);
    }

    let pattern = branch_pattern(ctx);
    let regex = Regex::new(pattern)
        .with_context(|| format!("invalid branch pattern '{}'", pattern))?;

    if regex.is_match(branch) {
        Ok(vec![])
    } else {
        Ok(vec![Finding::new(format!(
            "Branch '{}' does not match {}",
            branch, pattern
        ))])
    }
}

fn check_issue_reference(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    if ctx.issue().is_some() {
        return Ok(vec![]);
    }
    if ctx.branch().is_none() && ctx.commits().is_empty() && ctx.pull_request().is_none() {
        return Ok(vec![]);
    }

    let in_branch = ctx
        .branch()
        .is_some_and(|b| !PROTECTED_BRANCHES.contains(&b) && BRANCH_ISSUE.is_match(b));
    let in_commits = ctx.commits().iter().any(|c| TEXT_ISSUE.is_match(&c.message));
    let in_pr = ctx.pull_request().is_some_and(|pr| {
        TEXT_ISSUE.is_match(&pr.title) || pr.body.as_deref().is_some_and(|b| TEXT_ISSUE.is_match(b))
    });

    if in_branch || in_commits || in_pr {
        Ok(vec![])
    } else {
        Ok(vec![Finding::new(
            "No issue reference found in the branch name, commits or pull request",
        )])
    }
}

fn check_pr_description(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    let Some(pr) = ctx.pull_request() else {
        return Ok(vec![]);
    };
    let min = ctx
        .config()
        .rule_option_u64("wfl-003", "minLength", DEFAULT_PR_MIN_LENGTH) as usize;
    let length = pr.body.as_deref().map_or(0, |b| b.trim().chars().count());

    if length >= min {
        Ok(vec![])
    } else if length == 0 {
        Ok(vec![Finding::new(format!(
            "Pull request #{} has no description",
            pr.number
        ))])
    } else {
        Ok(vec![Finding::new(format!(
            "Pull request #{} description is {} characters (min {})",
            pr.number, length, min
        ))])
    }
}
