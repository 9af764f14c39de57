//! File selection and pattern scanning.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use serde::Serialize;

use crate::error::{Result, VibeError};
use crate::rules::{Finding, ProjectFile};
use crate::scanner::patterns::NamedPattern;

/// Paths never scanned: build output, dependencies, VCS metadata.
pub const DEFAULT_EXCLUDES: [&str; 10] = [
    "**/node_modules/**",
    "**/target/**",
    "**/dist/**",
    "**/build/**",
    "**/.git/**",
    "**/coverage/**",
    "**/vendor/**",
    "**/.next/**",
    "**/__pycache__/**",
    "**/*.min.js",
];

/// Files larger than this are not loaded.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// One regex match in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    /// Path relative to the project root
    pub file: PathBuf,
    /// 1-based line of the start of the match
    pub line: usize,
    /// Name of the pattern that matched
    pub pattern: String,
    /// Matched text
    pub matched: String,
}

impl PatternMatch {
    /// A finding located at this match.
    pub fn to_finding(&self, message: impl Into<String>) -> Finding {
        Finding::new(message).at(&self.file, self.line)
    }
}

/// Include / exclude globs applied to relative paths.
#[derive(Debug, Clone)]
pub struct FileSelector {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl FileSelector {
    /// Build a selector. An empty `include` selects every file; `exclude`
    /// is added to [`DEFAULT_EXCLUDES`].
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self> {
        let include = if include.is_empty() {
            None
        } else {
            Some(build_globset(include.iter().map(AsRef::as_ref))?)
        };
        let exclude = build_globset(
            DEFAULT_EXCLUDES
                .iter()
                .copied()
                .chain(exclude.iter().map(AsRef::as_ref)),
        )?;
        Ok(Self { include, exclude })
    }

    /// Whether a relative path is selected.
    pub fn matches(&self, path: &Path) -> bool {
        if self.exclude.is_match(path) {
            return false;
        }
        self.include.as_ref().is_none_or(|inc| inc.is_match(path))
    }
}

impl Default for FileSelector {
    fn default() -> Self {
        Self {
            include: None,
            exclude: build_globset(DEFAULT_EXCLUDES.iter().copied())
                .unwrap_or_else(|_| GlobSet::empty()),
        }
    }
}

fn build_globset<'a>(patterns: impl Iterator<Item = &'a str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| VibeError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| VibeError::InvalidPattern {
        pattern: String::from("<set>"),
        message: e.to_string(),
    })
}

/// 1-based line containing byte `offset`: newlines before it, plus one.
pub fn line_of(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    content.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}

/// Every match of every pattern in one file's content, pattern by pattern.
pub fn scan_content(file: &Path, content: &str, patterns: &[NamedPattern]) -> Vec<PatternMatch> {
    let mut matches = Vec::new();
    for pattern in patterns {
        for m in pattern.regex.find_iter(content) {
            matches.push(PatternMatch {
                file: file.to_path_buf(),
                line: line_of(content, m.start()),
                pattern: pattern.name.clone(),
                matched: m.as_str().to_string(),
            });
        }
    }
    matches
}

/// Scan already loaded files. Results are ordered file, then pattern, then
/// occurrence; overlapping matches are all kept.
pub fn scan_files(
    files: &[ProjectFile],
    patterns: &[NamedPattern],
    selector: &FileSelector,
) -> Vec<PatternMatch> {
    files
        .iter()
        .filter(|f| selector.matches(&f.path))
        .flat_map(|f| scan_content(&f.path, &f.content, patterns))
        .collect()
}

/// Relative paths of all selected files under `root`, sorted.
pub fn collect_files(root: &Path, selector: &FileSelector) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut paths = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if selector.matches(relative) {
            paths.push(relative.to_path_buf());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load every selected file under `root` with its content.
///
/// Files over [`MAX_FILE_SIZE`] and files that are not UTF-8 are skipped.
pub fn load_project_files(root: &Path, selector: &FileSelector) -> Result<Vec<ProjectFile>> {
    let mut files = Vec::new();
    for relative in collect_files(root, selector)? {
        let full = root.join(&relative);
        if fs::metadata(&full).is_ok_and(|m| m.len() > MAX_FILE_SIZE) {
            tracing::debug!(file = %relative.display(), "skipping large file");
            continue;
        }
        match String::from_utf8(fs::read(&full)?) {
            Ok(content) => files.push(ProjectFile::new(relative, content)),
            Err(_) => tracing::debug!(file = %relative.display(), "skipping binary file"),
        }
    }
    Ok(files)
}

/// Scan files under `root` matching `include` (all when empty) and not
/// matching `exclude` or the default excludes.
pub fn scan<S: AsRef<str>>(
    root: &Path,
    patterns: &[NamedPattern],
    include: &[S],
    exclude: &[S],
) -> Result<Vec<PatternMatch>> {
    let selector = FileSelector::new(include, exclude)?;
    let files = load_project_files(root, &selector)?;
    tracing::debug!(files = files.len(), patterns = patterns.len(), "scanning");
    Ok(scan_files(&files, patterns, &selector))
}
