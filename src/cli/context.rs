//! Building a [`ValidationContext`] from the working tree.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::rules::{PullRequest, ValidationContext};
use crate::scanner::{load_project_files, FileSelector};

use super::git::Git;

/// Commits read for history-based rules.
pub const RECENT_COMMITS: usize = 20;

/// Extra inputs for a context beyond what is on disk.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    /// Pending commit message (the `commit-msg` hook).
    pub commit_message: Option<String>,
    /// GitHub Actions event payload to read a pull request from.
    pub event_path: Option<PathBuf>,
}

impl ContextOptions {
    /// Options from the environment (`GITHUB_EVENT_PATH`).
    pub fn from_env() -> Self {
        Self {
            commit_message: None,
            event_path: env::var_os("GITHUB_EVENT_PATH").map(PathBuf::from),
        }
    }

    /// Read the pending commit message from a file git hands to `commit-msg`.
    ///
    /// Comment lines (starting with `#`) are dropped, as git does.
    pub fn with_message_file(mut self, path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read commit message from {}", path.display()))?;
        let message: Vec<&str> = raw.lines().filter(|l| !l.starts_with('#')).collect();
        self.commit_message = Some(message.join("\n").trim().to_string());
        Ok(self)
    }
}

/// Snapshot the project at `root`: files, git state, pull request.
pub fn build_context(
    root: &Path,
    config: Config,
    options: ContextOptions,
) -> Result<ValidationContext> {
    let files = load_project_files(root, &FileSelector::default())?;
    let git = Git::new(root);

    let (branch, commits, staged) = if git.is_repository() {
        (
            git.current_branch(),
            git.recent_commits(RECENT_COMMITS),
            git.staged_paths(),
        )
    } else {
        tracing::debug!(root = %root.display(), "not a git work tree");
        (None, Vec::new(), Vec::new())
    };
    let branch = branch.or_else(|| env::var("GITHUB_HEAD_REF").ok().filter(|b| !b.is_empty()));

    tracing::debug!(
        files = files.len(),
        staged = staged.len(),
        commits = commits.len(),
        branch = ?branch,
        "built validation context"
    );

    let mut ctx = ValidationContext::new(root, config)
        .with_files(files)
        .with_staged_files(staged)
        .with_commits(commits);
    if let Some(branch) = branch {
        ctx = ctx.with_branch(branch);
    }
    if let Some(message) = options.commit_message {
        ctx = ctx.with_commit_message(message);
    }
    if let Some(path) = options.event_path {
        match read_pull_request(&path) {
            Ok(Some(pr)) => ctx = ctx.with_pull_request(pr),
            Ok(None) => {}
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "ignoring unreadable event payload"
            ),
        }
    }
    Ok(ctx)
}

/// The `pull_request` object of a GitHub event payload, if present.
pub fn read_pull_request(path: &Path) -> anyhow::Result<Option<PullRequest>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let event: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let Some(pr) = event.get("pull_request") else {
        return Ok(None);
    };
    let number = pr
        .get("number")
        .and_then(Value::as_u64)
        .context("pull_request.number is missing")?;
    Ok(Some(PullRequest {
        number,
        title: pr
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        body: pr.get("body").and_then(Value::as_str).map(str::to_string),
        base: pr
            .pointer("/base/ref")
            .and_then(Value::as_str)
            .map(str::to_string),
    }))
}
