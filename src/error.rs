//! Error types for vibe-codex operations.
//!
//! This module defines [`VibeError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration and activation problems are `VibeError` variants and are
//!   fatal to the operation that hit them
//! - Rule checks, fixes, hooks and validators return `anyhow::Result`; the
//!   engine and dispatcher turn those failures into warnings or rejections
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for vibe-codex operations.
#[derive(Debug, Error)]
pub enum VibeError {
    /// Failed to parse a configuration or catalogue file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Configuration does not match the current schema.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Preset name not present in the catalogue.
    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },

    /// Module name not registered.
    #[error("Unknown module: {name}")]
    UnknownModule { name: String },

    /// A module with the same name is already registered.
    #[error("Module '{name}' is already registered")]
    DuplicateModule { name: String },

    /// Two active modules registered the same rule id.
    #[error("Rule '{id}' registered by '{module}' is already provided by another module")]
    DuplicateRule { id: String, module: String },

    /// A module registered a rule whose id is not shaped `category-NNN`.
    #[error("Rule id '{id}' registered by '{module}' is not a category-NNN id")]
    InvalidRuleId { id: String, module: String },

    /// Rule id not present in the catalogue.
    #[error("Unknown rule: {id}")]
    UnknownRule { id: String },

    /// A module was activated without one of its dependencies.
    #[error("Module '{module}' depends on '{missing}', which is not enabled")]
    DependencyViolation { module: String, missing: String },

    /// Module dependency cycle detected.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// Hook event name is not one of the supported git events.
    #[error("Unknown hook event: {event}")]
    UnknownHookEvent { event: String },

    /// No active module registered a validator with this name.
    #[error("Unknown validator: {name}")]
    UnknownValidator { name: String },

    /// Configuration could not be migrated to the current schema.
    #[error("Migration failed: {message}")]
    MigrationError { message: String },

    /// A glob or regex supplied by the caller failed to compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VibeError {
    /// Whether this error comes from configuration or module setup rather
    /// than from running rules.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            VibeError::ConfigParseError { .. }
                | VibeError::ConfigValidationError { .. }
                | VibeError::UnknownPreset { .. }
                | VibeError::UnknownModule { .. }
                | VibeError::DuplicateRule { .. }
                | VibeError::InvalidRuleId { .. }
                | VibeError::UnknownRule { .. }
                | VibeError::DependencyViolation { .. }
                | VibeError::CircularDependency { .. }
                | VibeError::MigrationError { .. }
        )
    }

    /// Process exit status for this error: `2` for configuration errors,
    /// `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_configuration_error() {
            2
        } else {
            1
        }
    }
}

/// Result type alias for vibe-codex operations.
pub type Result<T> = std::result::Result<T, VibeError>;
