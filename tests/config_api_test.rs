//! Integration tests for the config module public API.

use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use vibe_codex::config::{
    config_path, load_config, migrate, migrate_with_report, validate, Catalogue, Config,
    ConfigStore, CURRENT_VERSION, STANDARD_FALLBACK_RULES,
};
use vibe_codex::VibeError;

fn catalogue() -> Arc<Catalogue> {
    Arc::new(Catalogue::builtin().unwrap())
}

#[test]
fn public_api_is_accessible() {
    let config = Config::default();
    assert_eq!(config.version, CURRENT_VERSION);
    assert!(catalogue().presets().contains_key("standard"));
}

#[test]
fn missing_config_loads_as_none() {
    let temp = TempDir::new().unwrap();
    assert!(load_config(&config_path(temp.path())).unwrap().is_none());
}

#[test]
fn v2_config_is_migrated_and_written_back() {
    let temp = TempDir::new().unwrap();
    let path = config_path(temp.path());
    fs::write(
        &path,
        json!({
            "version": "2.4.1",
            "modules": {
                "core": { "enabled": true },
                "testing": { "enabled": true, "coverage": true }
            }
        })
        .to_string(),
    )
    .unwrap();

    let config = load_config(&path).unwrap().unwrap();
    assert!(config.is_rule_enabled("sec-001"));
    assert!(config.is_rule_enabled("tst-002"));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.ends_with('\n'));
    assert!(written.contains("\n  \"version\""));
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["version"], CURRENT_VERSION);
}

#[test]
fn migration_is_idempotent() {
    let v2 = json!({ "version": "2.0.0", "modules": { "documentation": true } });
    let once = migrate(&v2).unwrap();
    let twice = migrate(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn unmapped_v2_settings_fall_back_to_standard() {
    let outcome =
        migrate_with_report(&json!({ "version": "2.0.0", "modules": { "analytics": true } }))
            .unwrap();
    assert!(outcome.used_fallback);
    let mut expected: Vec<String> = STANDARD_FALLBACK_RULES.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(outcome.enabled_rules, expected);
}

#[test]
fn newer_major_is_rejected() {
    let err = migrate(&json!({ "version": "4.0.0", "rules": {} })).unwrap_err();
    assert!(matches!(err, VibeError::MigrationError { .. }));
}

#[test]
fn validation_is_idempotent() {
    let value = json!({
        "version": "3.0.0",
        "rules": {
            "sec-001": { "enabled": true },
            "bogus": { "enabled": true }
        }
    });
    let once = validate(&value).unwrap();
    assert!(once["rules"].get("bogus").is_none());
    assert_eq!(validate(&once).unwrap(), once);
}

#[test]
fn presets_expand_to_catalogue_rules() {
    let catalogue = catalogue();
    for (name, preset) in catalogue.presets() {
        let config = catalogue.apply_preset(name).unwrap();
        let mut expected: Vec<String> = preset.rules.iter().map(|id| id.to_string()).collect();
        expected.sort();
        assert_eq!(config.enabled_rules(), expected, "preset {name}");
    }
    assert!(matches!(
        catalogue.apply_preset("relaxed"),
        Err(VibeError::UnknownPreset { .. })
    ));
}

#[test]
fn save_drops_unknown_rules() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::for_project(temp.path(), catalogue());
    let mut config = Config::default();
    config.enable_rule("sec-001");
    config.enable_rule("xyz-999");

    let saved = store.save(config).unwrap();
    assert_eq!(saved.enabled_rules(), vec!["sec-001"]);
    assert!(saved.last_modified.is_some());

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.enabled_rules(), vec!["sec-001"]);
}
