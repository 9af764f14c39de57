//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the
//! `.vibe-codex.json` file format (schema version 3).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hooks::HookEvent;

/// File name of the per-project configuration.
pub const CONFIG_FILE_NAME: &str = ".vibe-codex.json";

/// Schema version written by this build.
pub const CURRENT_VERSION: &str = "3.0.0";

/// Major schema version this build understands.
pub const CURRENT_MAJOR: u64 = 3;

/// Root configuration structure for `.vibe-codex.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Schema version (`3.x.y`)
    pub version: String,

    /// Preset the rule set was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,

    /// Rule settings keyed by rule id
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,

    /// Facts about the project
    #[serde(default)]
    pub project_context: ProjectContext,

    /// Per-event hook switches; events not listed are enabled
    #[serde(default)]
    pub hooks: BTreeMap<HookEvent, bool>,

    /// When the configuration was first written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the configuration was last saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            preset: None,
            rules: BTreeMap::new(),
            project_context: ProjectContext::default(),
            hooks: BTreeMap::new(),
            created_at: None,
            last_modified: None,
        }
    }
}

impl Config {
    /// Settings for a rule, if listed.
    pub fn rule(&self, id: &str) -> Option<&RuleSetting> {
        self.rules.get(id)
    }

    /// Whether a rule is listed and enabled. Unlisted rules are disabled.
    pub fn is_rule_enabled(&self, id: &str) -> bool {
        self.rules.get(id).is_some_and(|r| r.enabled)
    }

    /// Whether a rule is explicitly switched off.
    pub fn is_rule_disabled(&self, id: &str) -> bool {
        self.rules.get(id).is_some_and(|r| !r.enabled)
    }

    /// Ids of all enabled rules, sorted.
    pub fn enabled_rules(&self) -> Vec<String> {
        self.rules
            .iter()
            .filter(|(_, r)| r.enabled)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Enable a rule, keeping any existing options.
    pub fn enable_rule(&mut self, id: impl Into<String>) {
        self.rules.entry(id.into()).or_default().enabled = true;
    }

    /// Disable a rule, keeping any existing options.
    pub fn disable_rule(&mut self, id: impl Into<String>) {
        self.rules.entry(id.into()).or_default().enabled = false;
    }

    /// A single option value for a rule.
    pub fn rule_option(&self, id: &str, key: &str) -> Option<&Value> {
        self.rules.get(id)?.options.as_ref()?.get(key)
    }

    /// An unsigned integer option, falling back to `default` when unset.
    ///
    /// Fractional numbers are rounded. Any other value is logged and
    /// replaced by `default`.
    pub fn rule_option_u64(&self, id: &str, key: &str, default: u64) -> u64 {
        let Some(value) = self.rule_option(id, key).filter(|v| !v.is_null()) else {
            return default;
        };
        let number = value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|f| *f >= 0.0)
                .map(|f| f.round() as u64)
        });
        match number {
            Some(n) => n,
            None => {
                tracing::warn!(
                    rule = id,
                    option = key,
                    value = %value,
                    default,
                    "option is not a non-negative number; using the default"
                );
                default
            }
        }
    }

    /// A string option, if set.
    pub fn rule_option_str(&self, id: &str, key: &str) -> Option<&str> {
        self.rule_option(id, key).and_then(Value::as_str)
    }

    /// Whether hooks for `event` should run. Unlisted events are enabled.
    pub fn is_hook_enabled(&self, event: HookEvent) -> bool {
        self.hooks.get(&event).copied().unwrap_or(true)
    }

    /// Set `last_modified` to now, and `created_at` if it was never set.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.created_at.get_or_insert(now);
        self.last_modified = Some(now);
    }
}

/// Settings for a single rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleSetting {
    /// Whether the rule runs
    pub enabled: bool,

    /// Rule-specific options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, Value>>,
}

impl RuleSetting {
    /// An enabled setting without options.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            options: None,
        }
    }
}

/// Facts about the project the rules may consult.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    /// Kind of project
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,

    /// Primary language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Primary framework
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

/// Named rule presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Minimal,
    Standard,
    Strict,
    Custom,
}

impl Preset {
    /// All accepted preset names.
    pub const NAMES: [&'static str; 4] = ["minimal", "standard", "strict", "custom"];

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Minimal => "minimal",
            Preset::Standard => "standard",
            Preset::Strict => "strict",
            Preset::Custom => "custom",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(Preset::Minimal),
            "standard" => Ok(Preset::Standard),
            "strict" => Ok(Preset::Strict),
            "custom" => Ok(Preset::Custom),
            other => Err(format!("unknown preset '{}'", other)),
        }
    }
}

/// Kind of project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Web,
    Api,
    Library,
    Cli,
    Fullstack,
    Mobile,
    Other,
}

impl ProjectType {
    /// All accepted project type names.
    pub const NAMES: [&'static str; 7] = [
        "web",
        "api",
        "library",
        "cli",
        "fullstack",
        "mobile",
        "other",
    ];
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(ProjectType::Web),
            "api" => Ok(ProjectType::Api),
            "library" => Ok(ProjectType::Library),
            "cli" => Ok(ProjectType::Cli),
            "fullstack" => Ok(ProjectType::Fullstack),
            "mobile" => Ok(ProjectType::Mobile),
            "other" => Ok(ProjectType::Other),
            other => Err(format!("unknown project type '{}'", other)),
        }
    }
}

/// JSON Schema for `.vibe-codex.json`.
pub fn json_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(Config)).unwrap_or(Value::Null)
}
