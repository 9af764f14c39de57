//! The rule catalogue (`registry.json`).
//!
//! The catalogue is the authoritative list of every rule that could be
//! enabled, independent of any one project's configuration, together with
//! rule categories and named presets. The built-in catalogue is embedded at
//! compile time; an external file can be loaded with [`Catalogue::load`].

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::schema::{Config, Preset, RuleSetting, CURRENT_VERSION};
use crate::error::{Result, VibeError};
use crate::hooks::HookEvent;
use crate::rules::{Level, RuleId, Severity};

/// Embedded built-in catalogue.
static BUILTIN_REGISTRY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/registry.json"
));

/// Metadata for one catalogued rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMeta {
    pub id: RuleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub level: Level,
    pub category: String,
    pub severity: Severity,
    /// Module that provides the check for this rule.
    pub module: String,
}

/// Display information for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub icon: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A named, curated set of rule ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rules: Vec<RuleId>,
}

/// The full rule catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    rules: Vec<RuleMeta>,
    #[serde(default)]
    categories: BTreeMap<String, CategoryInfo>,
    #[serde(default)]
    presets: BTreeMap<String, PresetInfo>,
}

impl Catalogue {
    /// The catalogue shipped with this build.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_REGISTRY, Path::new("data/registry.json"))
    }

    /// Load a catalogue from a `registry.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content, path)
    }

    /// Parse and check a catalogue. `source` is used for error reporting.
    pub fn from_json(content: &str, source: &Path) -> Result<Self> {
        let catalogue: Catalogue =
            serde_json::from_str(content).map_err(|e| VibeError::ConfigParseError {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;
        catalogue.check_consistency().map_err(|message| VibeError::ConfigParseError {
            path: source.to_path_buf(),
            message,
        })?;
        Ok(catalogue)
    }

    fn check_consistency(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !RuleId::is_well_formed(rule.id.as_str()) {
                return Err(format!("rule id '{}' is not category-NNN", rule.id));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(format!("rule id '{}' is listed twice", rule.id));
            }
            if !self.categories.is_empty() && !self.categories.contains_key(&rule.category) {
                return Err(format!(
                    "rule '{}' uses unknown category '{}'",
                    rule.id, rule.category
                ));
            }
        }
        for (name, preset) in &self.presets {
            if let Some(missing) = preset.rules.iter().find(|id| !seen.contains(id.as_str())) {
                return Err(format!(
                    "preset '{}' references unknown rule '{}'",
                    name, missing
                ));
            }
        }
        Ok(())
    }

    /// All catalogued rules, in catalogue order.
    pub fn rules(&self) -> &[RuleMeta] {
        &self.rules
    }

    /// Metadata for one rule.
    pub fn rule(&self, id: &str) -> Option<&RuleMeta> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Whether `id` is catalogued.
    pub fn contains_rule(&self, id: &str) -> bool {
        self.rule(id).is_some()
    }

    pub fn categories(&self) -> &BTreeMap<String, CategoryInfo> {
        &self.categories
    }

    pub fn presets(&self) -> &BTreeMap<String, PresetInfo> {
        &self.presets
    }

    /// Look up a preset by name.
    pub fn preset(&self, name: &str) -> Result<&PresetInfo> {
        self.presets.get(name).ok_or_else(|| VibeError::UnknownPreset {
            name: name.to_string(),
        })
    }

    /// Modules providing the given rule ids, in catalogue order, deduplicated.
    ///
    /// Ids that are not catalogued are ignored.
    pub fn modules_for<S: AsRef<str>>(&self, ids: &[S]) -> Vec<String> {
        let mut modules: Vec<String> = Vec::new();
        for meta in &self.rules {
            if ids.iter().any(|id| meta.id == id.as_ref()) && !modules.contains(&meta.module) {
                modules.push(meta.module.clone());
            }
        }
        modules
    }

    /// Build a fresh configuration with exactly the preset's rules enabled.
    ///
    /// Every hook event is enabled and both timestamps are stamped.
    pub fn apply_preset(&self, name: &str) -> Result<Config> {
        let preset = self.preset(name)?;
        let mut config = Config {
            version: CURRENT_VERSION.to_string(),
            preset: Some(name.parse().unwrap_or(Preset::Custom)),
            ..Config::default()
        };
        for id in &preset.rules {
            config
                .rules
                .insert(id.as_str().to_string(), RuleSetting::enabled());
        }
        for event in HookEvent::ALL {
            config.hooks.insert(event, true);
        }
        config.touch();
        tracing::debug!(preset = name, rules = preset.rules.len(), "applied preset");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogue_loads() {
        let catalogue = Catalogue::builtin().unwrap();
        assert!(catalogue.rules().len() >= 18);
        assert!(catalogue.contains_rule("tst-002"));
        assert!(catalogue.categories().contains_key("security"));
        assert!(catalogue.presets().contains_key("standard"));
    }

    #[test]
    fn strict_preset_lists_every_rule() {
        let catalogue = Catalogue::builtin().unwrap();
        let strict = catalogue.preset("strict").unwrap();
        assert_eq!(strict.rules.len(), catalogue.rules().len());
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let catalogue = Catalogue::builtin().unwrap();
        let err = catalogue.apply_preset("paranoid").unwrap_err();
        assert!(matches!(err, VibeError::UnknownPreset { .. }));
    }

    #[test]
    fn apply_minimal_enables_exactly_its_rules() {
        let catalogue = Catalogue::builtin().unwrap();
        let config = catalogue.apply_preset("minimal").unwrap();

        let mut expected: Vec<String> = catalogue
            .preset("minimal")
            .unwrap()
            .rules
            .iter()
            .map(|r| r.to_string())
            .collect();
        expected.sort();

        assert_eq!(config.enabled_rules(), expected);
        assert_eq!(config.preset, Some(Preset::Minimal));
        assert!(config.created_at.is_some());
        assert!(config.last_modified.is_some());
    }

    #[test]
    fn modules_for_follows_catalogue_order() {
        let catalogue = Catalogue::builtin().unwrap();
        let modules = catalogue.modules_for(&["tst-002", "sec-001", "nope-999"]);
        assert_eq!(modules, vec!["core".to_string(), "testing".to_string()]);
    }

    #[test]
    fn rejects_preset_with_unknown_rule() {
        let json = r#"{
            "rules": [{"id": "sec-001", "name": "x", "level": 1, "category": "security",
                       "severity": "error", "module": "core"}],
            "presets": {"broken": {"name": "Broken", "rules": ["sec-002"]}}
        }"#;
        let err = Catalogue::from_json(json, Path::new("registry.json")).unwrap_err();
        assert!(err.to_string().contains("sec-002"));
    }

    #[test]
    fn rejects_malformed_rule_id() {
        let json = r#"{"rules": [{"id": "security", "name": "x", "level": 1,
                       "category": "security", "severity": "error", "module": "core"}]}"#;
        assert!(Catalogue::from_json(json, Path::new("registry.json")).is_err());
    }

    #[test]
    fn rejects_out_of_range_level() {
        let json = r#"{"rules": [{"id": "sec-001", "name": "x", "level": 9,
                       "category": "security", "severity": "error", "module": "core"}]}"#;
        assert!(Catalogue::from_json(json, Path::new("registry.json")).is_err());
    }
}
