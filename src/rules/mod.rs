//! Policy rules and the context they are checked against.
//!
//! - [`Rule`] - Metadata plus a check function (and optional fix)
//! - [`Finding`] - One concrete failure reported by a check
//! - [`ValidationContext`] - Immutable project snapshot passed to checks
//!
//! # Example
//!
//! ```
//! use vibe_codex::config::Config;
//! use vibe_codex::rules::{Finding, Level, Rule, Severity, ValidationContext};
//!
//! let rule = Rule::new(
//!     "doc-100",
//!     "Has files",
//!     Level::new(4).unwrap(),
//!     "documentation",
//!     Severity::Warning,
//!     |ctx: &ValidationContext| {
//!         if ctx.files().is_empty() {
//!             Ok(vec![Finding::new("project has no files")])
//!         } else {
//!             Ok(vec![])
//!         }
//!     },
//! );
//!
//! let ctx = ValidationContext::new("/tmp/project", Config::default());
//! assert_eq!(rule.check(&ctx).unwrap().len(), 1);
//! ```

pub mod context;
pub mod finding;
pub mod rule;

pub use context::{CommitInfo, IssueRef, ProjectFile, PullRequest, ValidationContext};
pub use finding::Finding;
pub use rule::{FixFn, Level, Rule, RuleCheck, RuleId, RuleRef, Severity};
