//! Rule definitions.
//!
//! This module provides the core types for defining policy rules:
//!
//! - [`Rule`] - A declarative rule with metadata and a check function
//! - [`RuleCheck`] - The trait every check function implements
//! - [`RuleId`] - Unique `category-NNN` identifier for a rule
//! - [`Level`] - Execution group (1 runs first, 5 runs last)
//! - [`Severity`] - How findings are classified (error, warning, info)

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::context::ValidationContext;
use super::finding::Finding;

static RULE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*-[0-9]{3}$").unwrap());

/// Unique identifier for a rule, shaped `category-NNN` (e.g. `sec-001`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub String);

impl RuleId {
    /// Create a new rule ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `id` has the `category-NNN` shape.
    pub fn is_well_formed(id: &str) -> bool {
        RULE_ID_PATTERN.is_match(id)
    }

    /// The prefix before the number (`sec` for `sec-001`).
    pub fn prefix(&self) -> &str {
        self.0.rsplit_once('-').map_or(self.0.as_str(), |(p, _)| p)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for RuleId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RuleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Execution level of a rule, `1..=5`. Lower levels run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// Lowest (first) level.
    pub const MIN: u8 = 1;
    /// Highest (last) level.
    pub const MAX: u8 = 5;

    /// Create a level, returning `None` outside `1..=5`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// The numeric level.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "level must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )
        })
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a rule's findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, reported as a warning.
    Info,
    /// Should be addressed, reported as a warning.
    Warning,
    /// Reported as a violation.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// A check function that inspects the validation context.
///
/// An empty vector is a pass. Returning an error does not abort a
/// validation run; the engine records it as a warning for this rule.
pub trait RuleCheck: Send + Sync {
    /// Check the context and return any findings.
    fn check(&self, ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>>;
}

impl<F> RuleCheck for F
where
    F: Fn(&ValidationContext) -> anyhow::Result<Vec<Finding>> + Send + Sync,
{
    fn check(&self, ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
        self(ctx)
    }
}

/// Optional fix function. Returns `true` when something was changed.
pub type FixFn = Box<dyn Fn(&ValidationContext) -> anyhow::Result<bool> + Send + Sync>;

/// A policy rule.
pub struct Rule {
    /// Unique id (`category-NNN`).
    pub id: RuleId,
    /// Human-readable name.
    pub name: String,
    /// What the rule checks.
    pub description: String,
    /// Execution level.
    pub level: Level,
    /// Category name (e.g. `security`).
    pub category: String,
    /// Severity of findings.
    pub severity: Severity,
    /// Whether the providing module ships this rule switched on.
    pub enabled: bool,
    check: Box<dyn RuleCheck>,
    fix: Option<FixFn>,
}

impl Rule {
    /// Create a rule from a check closure, with an empty description.
    pub fn new(
        id: impl Into<RuleId>,
        name: impl Into<String>,
        level: Level,
        category: impl Into<String>,
        severity: Severity,
        check: impl Fn(&ValidationContext) -> anyhow::Result<Vec<Finding>> + Send + Sync + 'static,
    ) -> Self {
        Self::from_check(id, name, level, category, severity, check)
    }

    /// Create a rule from any [`RuleCheck`] implementation.
    pub fn from_check(
        id: impl Into<RuleId>,
        name: impl Into<String>,
        level: Level,
        category: impl Into<String>,
        severity: Severity,
        check: impl RuleCheck + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            level,
            category: category.into(),
            severity,
            enabled: true,
            check: Box::new(check),
            fix: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a fix function.
    pub fn with_fix(
        mut self,
        fix: impl Fn(&ValidationContext) -> anyhow::Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.fix = Some(Box::new(fix));
        self
    }

    /// Set whether the rule is switched on by its module.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Run the check function.
    pub fn check(&self, ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
        self.check.check(ctx)
    }

    /// Whether this rule has a fix function.
    pub fn supports_fix(&self) -> bool {
        self.fix.is_some()
    }

    /// Run the fix function, if any. `Ok(false)` when there is none.
    pub fn fix(&self, ctx: &ValidationContext) -> anyhow::Result<bool> {
        match &self.fix {
            Some(fix) => fix(ctx),
            None => Ok(false),
        }
    }

    /// A lightweight reference to this rule, used in reports.
    pub fn reference(&self) -> RuleRef {
        RuleRef {
            id: self.id.clone(),
            name: self.name.clone(),
            level: self.level,
            category: self.category.clone(),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("level", &self.level)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .field("enabled", &self.enabled)
            .field("fix", &self.fix.is_some())
            .finish()
    }
}

/// Reference to a rule that passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRef {
    pub id: RuleId,
    pub name: String,
    pub level: Level,
    pub category: String,
}
