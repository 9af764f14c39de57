//! Validation engine.
//!
//! - [`ValidationEngine`] - Runs rules level by level and classifies results
//! - [`ValidationReport`] - Violations, warnings, passes and a summary
//! - [`FixEngine`] - Applies fixes for flagged rules on request
//! - [`validate_project`] - Activate modules from configuration and validate
//! - [`output`] - Human and JSON report formatters

pub mod executor;
pub mod fix;
pub mod output;
pub mod project;
pub mod report;

pub use executor::{ValidationEngine, EXECUTION_FAILURE};
pub use fix::{FixEngine, FixResult};
pub use output::{OutputFormat, ReportFormatter};
pub use project::{
    activate_modules, modules_for_config, select_rules, validate_project, ValidateOptions,
};
pub use report::{Summary, ValidationReport};
