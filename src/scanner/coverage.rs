//! Approximate test coverage from file naming conventions.
//!
//! A source file counts as tested when some test file normalizes to the
//! same stem: `src/user.ts` is covered by `src/user.test.ts`,
//! `tests/user_test.py`, `__tests__/user.spec.js` or `test_user.py`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::rules::ProjectFile;

const SOURCE_EXTENSIONS: [&str; 15] = [
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "rs", "go", "rb", "java", "kt", "swift", "cs",
    "php",
];

const TEST_DIRS: [&str; 4] = ["tests", "test", "__tests__", "spec"];

const TEST_SUFFIXES: [&str; 4] = [".test", ".spec", "_test", "_spec"];

/// Result of comparing source files with test files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageEstimate {
    pub source_files: usize,
    pub test_files: usize,
    /// Share of source files with a matching test file, 0..=100.
    pub percentage: u8,
    /// Source files with no matching test file, sorted.
    pub untested: Vec<PathBuf>,
}

impl CoverageEstimate {
    /// Unrounded share of tested source files, 0.0..=100.0.
    ///
    /// Threshold comparisons use this rather than `percentage`, which rounds
    /// 199 of 200 up to 100.
    pub fn exact_percentage(&self) -> f64 {
        if self.source_files == 0 {
            return 100.0;
        }
        let tested = self.source_files - self.untested.len();
        tested as f64 * 100.0 / self.source_files as f64
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Whether `path` follows a test naming convention.
pub fn is_test_file(path: &Path) -> bool {
    if !has_source_extension(path) {
        return false;
    }
    let in_test_dir = path.components().any(|c| {
        TEST_DIRS
            .iter()
            .any(|d| c.as_os_str() == std::ffi::OsStr::new(d))
    });
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    in_test_dir || stem.starts_with("test_") || TEST_SUFFIXES.iter().any(|s| stem.ends_with(s))
}

/// Whether `path` is source code that should have tests.
pub fn is_source_file(path: &Path) -> bool {
    if !has_source_extension(path) || is_test_file(path) {
        return false;
    }
    let name = file_name(path);
    !name.ends_with(".d.ts") && !name.contains(".config.")
}

/// The stem a test file or source file is matched on.
fn normalized_stem(path: &Path) -> String {
    let mut stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    for suffix in TEST_SUFFIXES {
        if let Some(stripped) = stem.strip_suffix(suffix) {
            stem = stripped.to_string();
            break;
        }
    }
    if let Some(stripped) = stem.strip_prefix("test_") {
        stem = stripped.to_string();
    }
    stem
}

/// Estimate coverage for a file listing.
///
/// `percentage = round(100 * tested / sources)`, and 100 when there are no
/// source files at all.
pub fn estimate_coverage(files: &[ProjectFile]) -> CoverageEstimate {
    let test_stems: HashSet<String> = files
        .iter()
        .filter(|f| is_test_file(&f.path))
        .map(|f| normalized_stem(&f.path))
        .collect();
    let test_files = files.iter().filter(|f| is_test_file(&f.path)).count();

    let sources: Vec<&ProjectFile> = files.iter().filter(|f| is_source_file(&f.path)).collect();

    let mut untested: Vec<PathBuf> = sources
        .iter()
        .filter(|f| !test_stems.contains(&normalized_stem(&f.path)))
        .map(|f| f.path.clone())
        .collect();
    untested.sort();

    let percentage = if sources.is_empty() {
        100
    } else {
        let tested = sources.len() - untested.len();
        ((tested as f64 * 100.0) / sources.len() as f64).round() as u8
    };

    CoverageEstimate {
        source_files: sources.len(),
        test_files,
        percentage,
        untested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(path: &str) -> ProjectFile {
        ProjectFile::new(path, "")
    }

    #[test]
    fn recognizes_test_files() {
        assert!(is_test_file(Path::new("src/user.test.ts")));
        assert!(is_test_file(Path::new("src/user.spec.js")));
        assert!(is_test_file(Path::new("pkg/user_test.go")));
        assert!(is_test_file(Path::new("test_user.py")));
        assert!(is_test_file(Path::new("tests/cli.rs")));
        assert!(is_test_file(Path::new("src/__tests__/user.js")));
        assert!(!is_test_file(Path::new("src/user.ts")));
        assert!(!is_test_file(Path::new("tests/fixture.json")));
    }

    #[test]
    fn source_files_exclude_declarations_and_configs() {
        assert!(is_source_file(Path::new("src/user.ts")));
        assert!(!is_source_file(Path::new("src/types.d.ts")));
        assert!(!is_source_file(Path::new("jest.config.js")));
        assert!(!is_source_file(Path::new("README.md")));
    }

    #[test]
    fn matches_tests_by_stem() {
        let estimate = estimate_coverage(&[
            f("src/user.ts"),
            f("src/user.test.ts"),
            f("src/order.ts"),
            f("lib/parser.py"),
            f("tests/test_parser.py"),
        ]);
        assert_eq!(estimate.source_files, 3);
        assert_eq!(estimate.test_files, 2);
        assert_eq!(estimate.untested, vec![PathBuf::from("src/order.ts")]);
        assert_eq!(estimate.percentage, 67);
    }

    #[test]
    fn exact_percentage_does_not_round_up() {
        let mut files: Vec<ProjectFile> = (0..200).map(|i| f(&format!("src/m{i}.ts"))).collect();
        files.extend((0..199).map(|i| f(&format!("src/m{i}.test.ts"))));
        let estimate = estimate_coverage(&files);
        assert_eq!(estimate.percentage, 100);
        assert_eq!(estimate.untested.len(), 1);
        assert!(estimate.exact_percentage() < 100.0);
        assert!((estimate.exact_percentage() - 99.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_sources_is_full_coverage() {
        let estimate = estimate_coverage(&[f("README.md")]);
        assert_eq!(estimate.exact_percentage(), 100.0);
        assert_eq!(estimate.percentage, 100);
        assert!(estimate.untested.is_empty());
    }

    #[test]
    fn no_tests_is_zero() {
        let estimate = estimate_coverage(&[f("src/a.rs"), f("src/b.rs")]);
        assert_eq!(estimate.percentage, 0);
        assert_eq!(estimate.untested.len(), 2);
    }
}
