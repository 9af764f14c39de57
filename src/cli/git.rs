//! Read-only git queries.
//!
//! Every query shells out to the `git` binary. Outside a repository, or
//! when git is not installed, queries return empty values instead of
//! failing.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::rules::CommitInfo;

/// Separates fields within a `git log` record.
const FIELD_SEP: char = '\u{1f}';
/// Terminates a `git log` record.
const RECORD_SEP: char = '\u{1e}';

/// Git queries against one working tree.
pub struct Git<'a> {
    root: &'a Path,
}

impl<'a> Git<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    fn run(&self, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(self.root)
            .args(args)
            .output();
        match output {
            Ok(out) if out.status.success() => {
                Some(String::from_utf8_lossy(&out.stdout).into_owned())
            }
            Ok(out) => {
                tracing::debug!(
                    args = ?args,
                    status = ?out.status.code(),
                    "git query failed"
                );
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "git not available");
                None
            }
        }
    }

    pub fn is_repository(&self) -> bool {
        self.run(&["rev-parse", "--is-inside-work-tree"])
            .is_some_and(|out| out.trim() == "true")
    }

    /// The checked-out branch. `None` on a detached HEAD.
    pub fn current_branch(&self) -> Option<String> {
        let branch = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = branch.trim();
        (!branch.is_empty() && branch != "HEAD").then(|| branch.to_string())
    }

    /// Up to `limit` most recent commits, newest first.
    pub fn recent_commits(&self, limit: usize) -> Vec<CommitInfo> {
        let count = format!("-n{}", limit);
        let format = format!("--format=%H{}%an{}%B{}", FIELD_SEP, FIELD_SEP, RECORD_SEP);
        self.run(&["log", &count, &format])
            .map(|out| parse_log(&out))
            .unwrap_or_default()
    }

    /// Paths added, copied, modified or renamed in the index.
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.run(&["diff", "--cached", "--name-only", "--diff-filter=ACMR"])
            .map(|out| {
                out.lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn parse_log(output: &str) -> Vec<CommitInfo> {
    output
        .split(RECORD_SEP)
        .filter_map(|record| {
            let mut fields = record.trim_start_matches('\n').splitn(3, FIELD_SEP);
            let hash = fields.next()?.trim();
            if hash.is_empty() {
                return None;
            }
            let author = fields.next().map(str::to_string);
            let message = fields.next().unwrap_or("").trim_end();
            let mut commit = CommitInfo::new(hash, message);
            commit.author = author;
            Some(commit)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_log_records() {
        let out = format!(
            "abc123{f}Ada{f}feat: add parser\n\nBody line{r}\ndef456{f}Bob{f}fix(cli): flags{r}\n",
            f = FIELD_SEP,
            r = RECORD_SEP
        );
        let commits = parse_log(&out);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "abc123");
        assert_eq!(commits[0].subject(), "feat: add parser");
        assert!(commits[0].message.contains("Body line"));
        assert_eq!(commits[1].author.as_deref(), Some("Bob"));
    }

    #[test]
    fn empty_log_has_no_commits() {
        assert!(parse_log("").is_empty());
        assert!(parse_log("\n").is_empty());
    }

    #[test]
    fn outside_a_repository_everything_is_empty() {
        let temp = TempDir::new().unwrap();
        let git = Git::new(temp.path());
        assert!(git.staged_paths().is_empty());
        assert!(git.recent_commits(5).is_empty());
    }
}
