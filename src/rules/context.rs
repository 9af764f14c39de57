//! The validation context passed to every rule and hook.
//!
//! A [`ValidationContext`] is an immutable snapshot of the project: file
//! listing with content, git state and the active configuration. It is
//! built once per run by the caller; rules and hooks only read it.

use std::path::{Path, PathBuf};

use crate::config::Config;

/// A project file with its content. `path` is relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub path: PathBuf,
    pub content: String,
}

impl ProjectFile {
    /// Create a project file.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// The final path component, lowercased.
    pub fn file_name_lower(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Whether the file sits directly in the project root.
    pub fn is_root_level(&self) -> bool {
        self.path.components().count() == 1
    }
}

/// A commit from the recent history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub message: String,
    pub author: Option<String>,
}

impl CommitInfo {
    /// Create a commit record.
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
            author: None,
        }
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Abbreviated hash for display.
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map_or(self.hash.len(), |(i, _)| i);
        &self.hash[..end]
    }
}

/// The pull request under review, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub base: Option<String>,
}

/// The issue being worked on, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub number: u64,
    pub title: String,
}

/// Read-only snapshot of project state for one run.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    project_root: PathBuf,
    files: Vec<ProjectFile>,
    staged_files: Vec<PathBuf>,
    branch: Option<String>,
    commits: Vec<CommitInfo>,
    commit_message: Option<String>,
    pull_request: Option<PullRequest>,
    issue: Option<IssueRef>,
    config: Config,
}

impl ValidationContext {
    /// Create a context with no files and no git state.
    pub fn new(project_root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            project_root: project_root.into(),
            files: Vec::new(),
            staged_files: Vec::new(),
            branch: None,
            commits: Vec::new(),
            commit_message: None,
            pull_request: None,
            issue: None,
            config,
        }
    }

    /// Set the file listing.
    pub fn with_files(mut self, files: Vec<ProjectFile>) -> Self {
        self.files = files;
        self
    }

    /// Set the staged paths (relative to the project root).
    pub fn with_staged_files(mut self, staged: Vec<PathBuf>) -> Self {
        self.staged_files = staged;
        self
    }

    /// Set the current branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Set the recent commits, newest first.
    pub fn with_commits(mut self, commits: Vec<CommitInfo>) -> Self {
        self.commits = commits;
        self
    }

    /// Set the message of the commit being created (commit-msg hook).
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    /// Set the active pull request.
    pub fn with_pull_request(mut self, pr: PullRequest) -> Self {
        self.pull_request = Some(pr);
        self
    }

    /// Set the active issue.
    pub fn with_issue(mut self, issue: IssueRef) -> Self {
        self.issue = Some(issue);
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn files(&self) -> &[ProjectFile] {
        &self.files
    }

    pub fn staged_files(&self) -> &[PathBuf] {
        &self.staged_files
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn commits(&self) -> &[CommitInfo] {
        &self.commits
    }

    pub fn commit_message(&self) -> Option<&str> {
        self.commit_message.as_deref()
    }

    pub fn pull_request(&self) -> Option<&PullRequest> {
        self.pull_request.as_ref()
    }

    pub fn issue(&self) -> Option<&IssueRef> {
        self.issue.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Look up a file by its relative path.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&ProjectFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    /// Whether a root-level file with any of `names` exists (case-insensitive).
    pub fn has_root_file(&self, names: &[&str]) -> bool {
        self.files.iter().any(|f| {
            f.is_root_level() && {
                let name = f.file_name_lower();
                names.iter().any(|n| n.eq_ignore_ascii_case(&name))
            }
        })
    }

    /// Files that are staged for commit and present in the listing.
    pub fn staged(&self) -> impl Iterator<Item = &ProjectFile> {
        self.files
            .iter()
            .filter(|f| self.staged_files.iter().any(|s| s == &f.path))
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new("/project", Config::default())
    }
}
