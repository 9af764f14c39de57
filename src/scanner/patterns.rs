//! Named regex patterns used by the built-in rules.
//!
//! Patterns are compiled once on first use and shared. Matching is
//! stateless, so one compiled pattern can be applied to any number of
//! files without resetting anything between them.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, VibeError};

/// A regex with a short identifying name (e.g. `aws_access_key`).
#[derive(Debug, Clone)]
pub struct NamedPattern {
    pub name: String,
    pub regex: Regex,
}

impl NamedPattern {
    /// Compile `pattern` under `name`.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| VibeError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name: name.into(),
            regex,
        })
    }

    fn from_static(name: &str, regex: &LazyLock<Regex>) -> Self {
        Self {
            name: name.to_string(),
            regex: Regex::clone(regex),
        }
    }
}

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

// Secrets
lazy_regex!(
    RE_API_KEY,
    r#"(?i)\bapi[_-]?key\b\s*[:=]\s*["']([A-Za-z0-9_\-]{16,})["']"#
);
lazy_regex!(RE_AWS_ACCESS_KEY, r"\bAKIA[0-9A-Z]{16}\b");
lazy_regex!(RE_GITHUB_TOKEN, r"\bgh[pousr]_[A-Za-z0-9]{36}\b");
lazy_regex!(
    RE_PRIVATE_KEY,
    r"-----BEGIN (?:RSA |EC |DSA |OPENSSH |PGP )?PRIVATE KEY-----"
);
lazy_regex!(
    RE_PASSWORD,
    r#"(?i)\bpassword\b\s*[:=]\s*["'][^"'\s]{8,}["']"#
);
lazy_regex!(RE_SLACK_TOKEN, r"\bxox[baprs]-[A-Za-z0-9-]{10,}");
lazy_regex!(
    RE_GENERIC_SECRET,
    r#"(?i)\b(?:secret|token)\b\s*[:=]\s*["'][A-Za-z0-9_\-/+=]{16,}["']"#
);

// Leftover debugging
lazy_regex!(RE_CONSOLE_LOG, r"\bconsole\.(?:log|debug)\s*\(");
lazy_regex!(RE_DEBUGGER, r"(?m)^\s*debugger\s*;?\s*$");
lazy_regex!(RE_DBG_MACRO, r"\bdbg!\s*\(");
lazy_regex!(RE_BREAKPOINT, r"\bbreakpoint\(\)|\bpdb\.set_trace\(\)");

// Work markers
lazy_regex!(RE_TODO, r"\b(?:TODO|FIXME|HACK|XXX)\b");

// Focused or skipped tests
lazy_regex!(RE_ONLY, r"\b(?:describe|it|test|context)\.only\s*\(");
lazy_regex!(RE_SKIP, r"\b(?:describe|it|test|context)\.skip\s*\(");
lazy_regex!(RE_FOCUS_PREFIX, r"\b(?:fit|fdescribe|xit|xdescribe)\s*\(");
lazy_regex!(RE_RUST_IGNORE, r"#\[ignore\]");

/// The API key assignment pattern on its own.
pub fn api_key_pattern() -> NamedPattern {
    NamedPattern::from_static("api_key", &RE_API_KEY)
}

/// Hardcoded credentials and key material.
pub fn secret_patterns() -> Vec<NamedPattern> {
    vec![
        api_key_pattern(),
        NamedPattern::from_static("aws_access_key", &RE_AWS_ACCESS_KEY),
        NamedPattern::from_static("github_token", &RE_GITHUB_TOKEN),
        NamedPattern::from_static("private_key", &RE_PRIVATE_KEY),
        NamedPattern::from_static("password", &RE_PASSWORD),
        NamedPattern::from_static("slack_token", &RE_SLACK_TOKEN),
        NamedPattern::from_static("generic_secret", &RE_GENERIC_SECRET),
    ]
}

/// Debug output and breakpoints left in source.
pub fn debug_patterns() -> Vec<NamedPattern> {
    vec![
        NamedPattern::from_static("console_log", &RE_CONSOLE_LOG),
        NamedPattern::from_static("debugger", &RE_DEBUGGER),
        NamedPattern::from_static("dbg_macro", &RE_DBG_MACRO),
        NamedPattern::from_static("breakpoint", &RE_BREAKPOINT),
    ]
}

/// TODO / FIXME / HACK / XXX markers.
pub fn todo_patterns() -> Vec<NamedPattern> {
    vec![NamedPattern::from_static("todo", &RE_TODO)]
}

/// Focused (`.only`, `fit`) and skipped (`.skip`, `xit`, `#[ignore]`) tests.
pub fn focused_test_patterns() -> Vec<NamedPattern> {
    vec![
        NamedPattern::from_static("only", &RE_ONLY),
        NamedPattern::from_static("skip", &RE_SKIP),
        NamedPattern::from_static("focus_prefix", &RE_FOCUS_PREFIX),
        NamedPattern::from_static("rust_ignore", &RE_RUST_IGNORE),
    ]
}
