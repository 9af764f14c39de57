//! Configuration schema, validation, migration and persistence.
//!
//! - Schema definitions in [`schema`]
//! - Validation and normalization in [`validator`]
//! - Schema migration in [`migration`]
//! - The rule catalogue and presets in [`catalogue`]
//! - Loading and saving in [`loader`]
//!
//! # Example
//!
//! ```
//! use vibe_codex::config::{load_config, Catalogue, ConfigStore};
//! use std::sync::Arc;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let catalogue = Arc::new(Catalogue::builtin().unwrap());
//! let store = ConfigStore::for_project(temp.path(), catalogue.clone());
//!
//! assert!(store.load().unwrap().is_none());
//!
//! let config = catalogue.apply_preset("minimal").unwrap();
//! store.save(config).unwrap();
//!
//! let loaded = load_config(store.path()).unwrap().unwrap();
//! assert!(loaded.is_rule_enabled("sec-001"));
//! ```

pub mod catalogue;
pub mod loader;
pub mod migration;
pub mod schema;
pub mod validator;

pub use catalogue::{Catalogue, CategoryInfo, PresetInfo, RuleMeta};
pub use loader::{config_path, load_config, ConfigStore};
pub use migration::{
    detect_major, migrate, migrate_with_report, needs_migration, MigrationOutcome,
    STANDARD_FALLBACK_RULES,
};
pub use schema::{
    json_schema, Config, Preset, ProjectContext, ProjectType, RuleSetting, CONFIG_FILE_NAME,
    CURRENT_MAJOR, CURRENT_VERSION,
};
pub use validator::{validate, validate_config, ValidationError, ValidationErrors};
