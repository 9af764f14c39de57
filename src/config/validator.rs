//! Configuration validation.
//!
//! Validation works on the raw JSON value so that it can normalize as well
//! as check:
//! - `version` is required and must be a `3.x` version string
//! - `preset` and `projectContext.type` must be known enum values
//! - `rules` keys must be `category-NNN` ids; other keys are dropped
//! - numeric rule options (`tst-002.threshold`, ...) must be whole numbers
//! - `hooks` keys that are not git events are dropped
//! - unknown top-level and nested keys are dropped, not rejected
//!
//! Every problem is collected rather than stopping at the first one.

use std::fmt;

use chrono::DateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::schema::{Config, Preset, ProjectType, CURRENT_MAJOR, CURRENT_VERSION};
use crate::hooks::HookEvent;
use crate::rules::RuleId;

const TOP_LEVEL_KEYS: [&str; 7] = [
    "version",
    "preset",
    "rules",
    "projectContext",
    "hooks",
    "createdAt",
    "lastModified",
];

/// Rule options that must be non-negative whole numbers, with an upper
/// bound where one applies.
const INTEGER_OPTIONS: [(&str, &str, Option<u64>); 3] = [
    ("tst-002", "threshold", Some(100)),
    ("cmt-002", "maxLength", None),
    ("wfl-003", "minLength", None),
];

/// Whether `rule.key` is one of the whole-number options.
pub(crate) fn is_integer_option(rule: &str, key: &str) -> bool {
    INTEGER_OPTIONS
        .iter()
        .any(|(r, k, _)| *r == rule && *k == key)
}

/// One validation problem, located by a dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Location in the document (e.g. `rules.sec-001.enabled`)
    pub path: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// All problems found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate and normalize a configuration document.
///
/// On success the returned value contains only known keys, with rule
/// shorthands (`"sec-001": true`) expanded to `{ "enabled": true }`.
pub fn validate(value: &Value) -> Result<Value, ValidationErrors> {
    let mut errors = Vec::new();

    let Some(root) = value.as_object() else {
        return Err(ValidationErrors(vec![ValidationError::new(
            "",
            "configuration must be a JSON object",
        )]));
    };

    let mut out = Map::new();

    for key in root.keys() {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            tracing::debug!(key = %key, "dropping unknown configuration key");
        }
    }

    match root.get("version") {
        None => errors.push(ValidationError::new("version", "is required")),
        Some(Value::String(v)) => {
            if parse_major(v) == Some(CURRENT_MAJOR) {
                out.insert("version".into(), Value::String(v.clone()));
            } else {
                errors.push(ValidationError::new(
                    "version",
                    format!("expected a {}.x version, got '{}'", CURRENT_MAJOR, v),
                ));
            }
        }
        Some(Value::Number(n)) if n.as_u64() == Some(CURRENT_MAJOR) => {
            out.insert("version".into(), Value::String(CURRENT_VERSION.to_string()));
        }
        Some(_) => errors.push(ValidationError::new(
            "version",
            format!("must be a version string such as \"{}\"", CURRENT_VERSION),
        )),
    }

    if let Some(preset) = root.get("preset") {
        match preset {
            Value::Null => {}
            Value::String(p) if p.parse::<Preset>().is_ok() => {
                out.insert("preset".into(), preset.clone());
            }
            _ => errors.push(ValidationError::new(
                "preset",
                format!("must be one of: {}", Preset::NAMES.join(", ")),
            )),
        }
    }

    if let Some(rules) = root.get("rules") {
        out.insert("rules".into(), validate_rules(rules, &mut errors));
    }

    if let Some(context) = root.get("projectContext") {
        out.insert(
            "projectContext".into(),
            validate_project_context(context, &mut errors),
        );
    }

    if let Some(hooks) = root.get("hooks") {
        out.insert("hooks".into(), validate_hooks(hooks, &mut errors));
    }

    for key in ["createdAt", "lastModified"] {
        match root.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(ts)) if DateTime::parse_from_rfc3339(ts).is_ok() => {
                out.insert(key.into(), Value::String(ts.clone()));
            }
            Some(_) => errors.push(ValidationError::new(key, "must be an RFC 3339 timestamp")),
        }
    }

    if errors.is_empty() {
        Ok(Value::Object(out))
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Validate a document and deserialize the normalized value.
pub fn validate_config(value: &Value) -> Result<Config, ValidationErrors> {
    let normalized = validate(value)?;
    serde_json::from_value(normalized)
        .map_err(|e| ValidationErrors(vec![ValidationError::new("", e.to_string())]))
}

/// Major component of a `major.minor.patch` string.
pub(crate) fn parse_major(version: &str) -> Option<u64> {
    version.split('.').next()?.trim().parse().ok()
}

fn validate_rules(rules: &Value, errors: &mut Vec<ValidationError>) -> Value {
    let Some(rules) = rules.as_object() else {
        errors.push(ValidationError::new("rules", "must be an object"));
        return Value::Object(Map::new());
    };

    let mut out = Map::new();
    for (id, setting) in rules {
        if !RuleId::is_well_formed(id) {
            tracing::warn!(rule = %id, "dropping rule key that is not a category-NNN id");
            continue;
        }
        let path = format!("rules.{}", id);
        match setting {
            Value::Bool(enabled) => {
                out.insert(id.clone(), serde_json::json!({ "enabled": enabled }));
            }
            Value::Object(obj) => {
                let mut normalized = Map::new();
                match obj.get("enabled") {
                    Some(Value::Bool(b)) => {
                        normalized.insert("enabled".into(), Value::Bool(*b));
                    }
                    Some(_) => errors.push(ValidationError::new(
                        format!("{}.enabled", path),
                        "must be a boolean",
                    )),
                    None => errors.push(ValidationError::new(
                        format!("{}.enabled", path),
                        "is required",
                    )),
                }
                match obj.get("options") {
                    None | Some(Value::Null) => {}
                    Some(Value::Object(options)) => {
                        let options = validate_options(id, options, &path, errors);
                        normalized.insert("options".into(), Value::Object(options));
                    }
                    Some(_) => errors.push(ValidationError::new(
                        format!("{}.options", path),
                        "must be an object",
                    )),
                }
                out.insert(id.clone(), Value::Object(normalized));
            }
            _ => errors.push(ValidationError::new(
                path,
                "must be a boolean or an object with 'enabled'",
            )),
        }
    }
    Value::Object(out)
}

/// Check the whole-number options of rule `id`. Integral floats such as
/// `90.0` are normalized to integers.
fn validate_options(
    id: &str,
    options: &Map<String, Value>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) -> Map<String, Value> {
    let mut out = options.clone();
    for (_, key, max) in INTEGER_OPTIONS.iter().filter(|(rule, _, _)| *rule == id) {
        let value = match options.get(*key) {
            None => continue,
            Some(Value::Null) => {
                out.remove(*key);
                continue;
            }
            Some(value) => value,
        };
        let option_path = format!("{}.options.{}", path, key);
        match (whole_number(value), max) {
            (Some(n), Some(max)) if n > *max => {
                errors.push(ValidationError::new(
                    option_path,
                    format!("must be at most {}, got {}", max, n),
                ));
            }
            (Some(n), _) => {
                out.insert(key.to_string(), Value::from(n));
            }
            (None, _) => errors.push(ValidationError::new(
                option_path,
                format!("must be a non-negative whole number, got {}", value),
            )),
        }
    }
    out
}

fn whole_number(value: &Value) -> Option<u64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn validate_project_context(context: &Value, errors: &mut Vec<ValidationError>) -> Value {
    let Some(context) = context.as_object() else {
        errors.push(ValidationError::new("projectContext", "must be an object"));
        return Value::Object(Map::new());
    };

    let mut out = Map::new();
    match context.get("type") {
        None | Some(Value::Null) => {}
        Some(Value::String(t)) if t.parse::<ProjectType>().is_ok() => {
            out.insert("type".into(), Value::String(t.clone()));
        }
        Some(_) => errors.push(ValidationError::new(
            "projectContext.type",
            format!("must be one of: {}", ProjectType::NAMES.join(", ")),
        )),
    }
    for key in ["language", "framework"] {
        match context.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => {
                out.insert(key.into(), Value::String(s.clone()));
            }
            Some(_) => errors.push(ValidationError::new(
                format!("projectContext.{}", key),
                "must be a string",
            )),
        }
    }
    Value::Object(out)
}

fn validate_hooks(hooks: &Value, errors: &mut Vec<ValidationError>) -> Value {
    let Some(hooks) = hooks.as_object() else {
        errors.push(ValidationError::new("hooks", "must be an object"));
        return Value::Object(Map::new());
    };

    let mut out = Map::new();
    for (event, enabled) in hooks {
        if event.parse::<HookEvent>().is_err() {
            tracing::debug!(event = %event, "dropping unknown hook event");
            continue;
        }
        match enabled {
            Value::Bool(b) => {
                out.insert(event.clone(), Value::Bool(*b));
            }
            _ => errors.push(ValidationError::new(
                format!("hooks.{}", event),
                "must be a boolean",
            )),
        }
    }
    Value::Object(out)
}
