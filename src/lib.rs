//! vibe-codex - Project policy rules enforced through git lifecycle events.
//!
//! Rules (security, commits, workflow, testing, documentation, quality,
//! deployment) are bundled into modules, activated from a versioned
//! `.vibe-codex.json`, evaluated against a snapshot of the project and
//! wired into git hooks.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration schema, validation, migration and the rule catalogue
//! - [`engine`] - Rule execution, reports and fixes
//! - [`error`] - Error types and result aliases
//! - [`hooks`] - Git events and hook dispatch
//! - [`modules`] - The module contract, registry and built-in modules
//! - [`rules`] - Rules, findings and the validation context
//! - [`scanner`] - Pattern scanning and coverage estimation
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use vibe_codex::config::Catalogue;
//! use vibe_codex::engine::{validate_project, ValidateOptions};
//! use vibe_codex::modules::ModuleRegistry;
//! use vibe_codex::rules::{ProjectFile, ValidationContext};
//!
//! let catalogue = Arc::new(Catalogue::builtin().unwrap());
//! let config = catalogue.apply_preset("minimal").unwrap();
//! let ctx = ValidationContext::new("/tmp/project", config)
//!     .with_files(vec![ProjectFile::new("README.md", "# Project\n")]);
//!
//! let mut registry = ModuleRegistry::with_builtins(catalogue);
//! let report = validate_project(&mut registry, &ctx, &ValidateOptions::default()).unwrap();
//! assert_eq!(report.summary().total, 3);
//! assert!(!report.has_violations());
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod modules;
pub mod rules;
pub mod scanner;
pub mod ui;

pub use error::{Result, VibeError};
