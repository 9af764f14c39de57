//! Configuration file loading and saving.
//!
//! [`ConfigStore`] owns the on-disk `.vibe-codex.json`. Loading migrates
//! outdated documents and writes the migrated form back; saving validates
//! before anything touches the file, so a bad configuration never
//! replaces a good one.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::config::catalogue::Catalogue;
use crate::config::migration::{migrate_with_report, needs_migration};
use crate::config::schema::{Config, CONFIG_FILE_NAME};
use crate::config::validator::validate_config;
use crate::error::{Result, VibeError};

/// Path of the configuration file for a project root.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

/// Reads and writes one configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    catalogue: Arc<Catalogue>,
}

impl ConfigStore {
    /// Create a store for `path`, checking rule ids against `catalogue`.
    pub fn new(path: impl Into<PathBuf>, catalogue: Arc<Catalogue>) -> Self {
        Self {
            path: path.into(),
            catalogue,
        }
    }

    /// Store for the configuration file of a project root.
    pub fn for_project(project_root: &Path, catalogue: Arc<Catalogue>) -> Self {
        Self::new(config_path(project_root), catalogue)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the configuration file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the raw JSON document, or `None` when there is no file.
    pub fn load_value(&self) -> Result<Option<Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(VibeError::Io(e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| VibeError::ConfigParseError {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    /// Load the configuration.
    ///
    /// Returns `Ok(None)` when no file exists yet. An outdated document is
    /// migrated and the migrated form is written back before returning.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParseError` if the file is not valid JSON,
    /// `MigrationError` if it cannot be migrated, and
    /// `ConfigValidationError` if it does not match the current schema.
    pub fn load(&self) -> Result<Option<Config>> {
        let Some(value) = self.load_value()? else {
            tracing::debug!(path = %self.path.display(), "no configuration file");
            return Ok(None);
        };

        if needs_migration(&value) {
            let outcome = migrate_with_report(&value)?;
            tracing::info!(
                path = %self.path.display(),
                from = outcome.from_major,
                rules = outcome.enabled_rules.len(),
                "migrated configuration"
            );
            let config = self.parse(&outcome.config)?;
            return self.save(config).map(Some);
        }

        self.parse(&value).map(Some)
    }

    fn parse(&self, value: &Value) -> Result<Config> {
        validate_config(value).map_err(|errors| VibeError::ConfigValidationError {
            message: format!("{} ({})", errors, self.path.display()),
        })
    }

    /// Validate and write `config`, returning what was written.
    ///
    /// Rule ids the catalogue does not know are dropped and timestamps are
    /// refreshed. The write goes through a temporary file and a rename.
    pub fn save(&self, mut config: Config) -> Result<Config> {
        let catalogue = &self.catalogue;
        config.rules.retain(|id, _| {
            let known = catalogue.contains_rule(id);
            if !known {
                tracing::warn!(rule = %id, "dropping rule unknown to the catalogue");
            }
            known
        });
        config.touch();

        let value = serde_json::to_value(&config)?;
        let config = self.parse(&value)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut content = serde_json::to_string_pretty(&config)?;
        content.push('\n');

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "saved configuration");
        Ok(config)
    }
}

/// Load a project configuration using the built-in catalogue.
///
/// See [`ConfigStore::load`].
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    let catalogue = Arc::new(Catalogue::builtin()?);
    ConfigStore::new(path, catalogue).load()
}
