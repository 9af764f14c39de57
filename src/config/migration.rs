//! Schema migration.
//!
//! Older configurations (schema v2) toggled whole modules and their
//! settings (`modules.<name>.<setting>`). The current schema enables rules
//! by id. Migration walks a static, versioned list of steps; each step owns
//! the lookup tables that translate one schema into the next.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::config::schema::{ProjectType, CURRENT_MAJOR, CURRENT_VERSION};
use crate::config::validator::{is_integer_option, parse_major, validate};
use crate::error::{Result, VibeError};
use crate::hooks::HookEvent;

/// Rule ids enabled when nothing in a v2 configuration maps to a rule.
///
/// Mirrors the `standard` preset of the built-in catalogue.
pub const STANDARD_FALLBACK_RULES: [&str; 10] = [
    "sec-001", "sec-002", "sec-003", "cmt-001", "cmt-002", "wfl-001", "tst-001", "tst-003",
    "doc-001", "qua-001",
];

/// v2 `module.setting` keys and the v3 rule ids they enable.
const V2_RULE_MAP: &[(&str, &[&str])] = &[
    ("core.enabled", &["sec-001", "cmt-001"]),
    ("core.secretScanning", &["sec-001", "sec-002", "sec-003"]),
    ("core.commitFormat", &["cmt-001"]),
    ("core.commitLength", &["cmt-002"]),
    ("core.readme", &["doc-001"]),
    ("github.branchNaming", &["wfl-001"]),
    ("github.issueTracking", &["wfl-002"]),
    ("github.prDescription", &["wfl-003"]),
    ("github-workflow.branchNaming", &["wfl-001"]),
    ("github-workflow.issueTracking", &["wfl-002"]),
    ("github-workflow.prDescription", &["wfl-003"]),
    ("testing.enabled", &["tst-001"]),
    ("testing.requireTests", &["tst-001"]),
    ("testing.coverage", &["tst-002"]),
    ("testing.noFocusedTests", &["tst-003"]),
    ("documentation.enabled", &["doc-001"]),
    ("documentation.readme", &["doc-001"]),
    ("documentation.changelog", &["doc-002"]),
    ("documentation.license", &["doc-003"]),
    ("quality.noDebugStatements", &["qua-001"]),
    ("quality.todoTracking", &["qua-002"]),
    ("deployment.enabled", &["dep-001"]),
    ("deployment.lockfile", &["dep-002"]),
];

/// v2 settings that carry a value into a v3 rule option:
/// (`module.setting`, rule id, option key).
const V2_OPTION_MAP: &[(&str, &str, &str)] = &[
    ("testing.coverageThreshold", "tst-002", "threshold"),
    ("core.commitMaxLength", "cmt-002", "maxLength"),
    ("github.branchPattern", "wfl-001", "pattern"),
    ("github-workflow.branchPattern", "wfl-001", "pattern"),
];

/// One schema step, from one major version to the next.
struct MigrationStep {
    from: u64,
    to: u64,
    apply: fn(&Value, &mut StepReport) -> Result<Value>,
}

static STEPS: &[MigrationStep] = &[MigrationStep {
    from: 2,
    to: 3,
    apply: migrate_v2_to_v3,
}];

#[derive(Debug, Default)]
struct StepReport {
    enabled_rules: Vec<String>,
    unmapped: Vec<String>,
    used_fallback: bool,
}

/// Result of migrating one configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    /// The configuration in the current schema.
    pub config: Value,
    /// Major schema version the input was written in.
    pub from_major: u64,
    /// Whether any step ran.
    pub migrated: bool,
    /// Rules enabled by the migration, sorted.
    pub enabled_rules: Vec<String>,
    /// Enabled `module.setting` keys with no mapping.
    pub unmapped: Vec<String>,
    /// Whether the standard fallback list was used.
    pub used_fallback: bool,
}

/// Major schema version of a configuration document.
pub fn detect_major(value: &Value) -> Result<u64> {
    match value.get("version") {
        Some(Value::String(v)) => parse_major(v).ok_or_else(|| VibeError::MigrationError {
            message: format!("unrecognized version '{}'", v),
        }),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .ok_or_else(|| VibeError::MigrationError {
                message: format!("unrecognized version {}", n),
            }),
        None if value.get("modules").is_some() => Ok(2),
        _ => Err(VibeError::MigrationError {
            message: "configuration has no version".to_string(),
        }),
    }
}

/// Whether `value` is written in an older schema.
pub fn needs_migration(value: &Value) -> bool {
    detect_major(value).is_ok_and(|major| major < CURRENT_MAJOR)
}

/// Migrate a configuration to the current schema.
///
/// A document that is already current is returned unchanged.
pub fn migrate(value: &Value) -> Result<Value> {
    migrate_with_report(value).map(|outcome| outcome.config)
}

/// Migrate a configuration and report what changed.
pub fn migrate_with_report(value: &Value) -> Result<MigrationOutcome> {
    let from_major = detect_major(value)?;

    if from_major > CURRENT_MAJOR {
        return Err(VibeError::MigrationError {
            message: format!(
                "configuration version {} is newer than supported version {}",
                from_major, CURRENT_MAJOR
            ),
        });
    }

    let mut outcome = MigrationOutcome {
        config: value.clone(),
        from_major,
        migrated: false,
        enabled_rules: Vec::new(),
        unmapped: Vec::new(),
        used_fallback: false,
    };

    let mut major = from_major;
    while major < CURRENT_MAJOR {
        let step = STEPS
            .iter()
            .find(|s| s.from == major)
            .ok_or_else(|| VibeError::MigrationError {
                message: format!("no migration path from version {}", major),
            })?;

        let mut report = StepReport::default();
        outcome.config = (step.apply)(&outcome.config, &mut report)?;
        outcome.enabled_rules = report.enabled_rules;
        outcome.unmapped.extend(report.unmapped);
        outcome.used_fallback |= report.used_fallback;
        outcome.migrated = true;

        tracing::debug!(from = step.from, to = step.to, "applied migration step");
        major = step.to;
    }

    if outcome.migrated {
        outcome.config = validate(&outcome.config).map_err(|errors| VibeError::MigrationError {
            message: format!("migrated configuration is invalid: {}", errors),
        })?;
    }

    Ok(outcome)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

/// Settings of an enabled v2 module, or `None` when the module is off.
fn enabled_settings(module: &Value) -> Option<Map<String, Value>> {
    match module {
        Value::Bool(true) => Some(Map::new()),
        Value::Object(settings) => {
            let off = settings.get("enabled") == Some(&Value::Bool(false));
            (!off).then(|| settings.clone())
        }
        _ => None,
    }
}

/// A v2 setting as a v3 rule option. v2 accepted numbers written as
/// strings (`"90"`); those become numbers for whole-number options.
fn option_value(rule: &str, option: &str, value: &Value) -> Value {
    match value {
        Value::String(s) if is_integer_option(rule, option) => s
            .trim()
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| value.clone()),
        _ => value.clone(),
    }
}

fn migrate_v2_to_v3(old: &Value, report: &mut StepReport) -> Result<Value> {
    let mut enabled: BTreeSet<String> = BTreeSet::new();
    let mut options: BTreeMap<String, Map<String, Value>> = BTreeMap::new();

    let modules = old
        .get("modules")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    for (module, settings) in &modules {
        let Some(settings) = enabled_settings(settings) else {
            continue;
        };

        let enabled_key = format!("{}.enabled", module);
        if let Some((_, ids)) = V2_RULE_MAP.iter().find(|(k, _)| *k == enabled_key) {
            enabled.extend(ids.iter().map(|id| id.to_string()));
        }

        for (setting, value) in &settings {
            if setting == "enabled" || !is_truthy(value) {
                continue;
            }
            let key = format!("{}.{}", module, setting);
            if let Some((_, ids)) = V2_RULE_MAP.iter().find(|(k, _)| *k == key) {
                enabled.extend(ids.iter().map(|id| id.to_string()));
            } else if let Some((_, rule, option)) = V2_OPTION_MAP.iter().find(|(k, _, _)| *k == key)
            {
                options
                    .entry(rule.to_string())
                    .or_default()
                    .insert(option.to_string(), option_value(rule, option, value));
            } else {
                report.unmapped.push(key);
            }
        }
    }

    let preset = if enabled.is_empty() {
        tracing::warn!(
            "no v2 module settings mapped to rules; falling back to the standard rule set"
        );
        enabled.extend(STANDARD_FALLBACK_RULES.iter().map(|id| id.to_string()));
        report.used_fallback = true;
        "standard"
    } else {
        tracing::info!(rules = enabled.len(), "migrated v2 module settings to rule ids");
        "custom"
    };

    if !report.unmapped.is_empty() {
        tracing::debug!(unmapped = ?report.unmapped, "v2 settings without a rule mapping");
    }

    let mut rules = Map::new();
    for id in &enabled {
        let mut setting = Map::new();
        setting.insert("enabled".into(), Value::Bool(true));
        if let Some(opts) = options.remove(id) {
            setting.insert("options".into(), Value::Object(opts));
        }
        rules.insert(id.clone(), Value::Object(setting));
    }
    for rule in options.keys() {
        tracing::debug!(rule = %rule, "dropping options for a rule the migration did not enable");
    }

    let now = Utc::now().to_rfc3339();
    let created_at = old
        .get("createdAt")
        .and_then(Value::as_str)
        .filter(|ts| DateTime::parse_from_rfc3339(ts).is_ok())
        .map_or_else(|| now.clone(), str::to_string);

    report.enabled_rules = enabled.into_iter().collect();

    Ok(json!({
        "version": CURRENT_VERSION,
        "preset": preset,
        "rules": rules,
        "projectContext": migrate_project_context(old),
        "hooks": migrate_hooks(old),
        "createdAt": created_at,
        "lastModified": now,
    }))
}

fn migrate_project_context(old: &Value) -> Value {
    let project = old.get("project");
    let mut context = Map::new();

    let project_type = old
        .get("projectType")
        .or_else(|| project.and_then(|p| p.get("type")))
        .and_then(Value::as_str);
    if let Some(t) = project_type {
        if t.parse::<ProjectType>().is_ok() {
            context.insert("type".into(), Value::String(t.to_string()));
        } else {
            tracing::debug!(project_type = t, "dropping unknown project type");
        }
    }

    for key in ["language", "framework"] {
        if let Some(v) = project.and_then(|p| p.get(key)).and_then(Value::as_str) {
            context.insert(key.into(), Value::String(v.to_string()));
        }
    }

    Value::Object(context)
}

fn migrate_hooks(old: &Value) -> Value {
    let mut hooks = Map::new();

    if let Some(all) = old.get("gitHooks").and_then(Value::as_bool) {
        for event in HookEvent::ALL {
            hooks.insert(event.as_str().to_string(), Value::Bool(all));
        }
    }

    if let Some(old_hooks) = old.get("hooks").and_then(Value::as_object) {
        for (name, value) in old_hooks {
            if let (Ok(event), Some(on)) = (name.parse::<HookEvent>(), value.as_bool()) {
                hooks.insert(event.as_str().to_string(), Value::Bool(on));
            }
        }
    }

    Value::Object(hooks)
}
