//! Pattern scanning over project files.
//!
//! - [`patterns`] - Named regexes for secrets, debug output, TODOs and focused tests
//! - [`scan`] - Glob-based file selection and regex scanning with line numbers
//! - [`coverage`] - Naming-convention based test coverage estimate

pub mod coverage;
pub mod patterns;
pub mod scan;

pub use coverage::{estimate_coverage, is_source_file, is_test_file, CoverageEstimate};
pub use patterns::{
    api_key_pattern, debug_patterns, focused_test_patterns, secret_patterns, todo_patterns,
    NamedPattern,
};
pub use scan::{
    collect_files, line_of, load_project_files, scan, scan_content, scan_files, FileSelector,
    PatternMatch, DEFAULT_EXCLUDES, MAX_FILE_SIZE,
};
