//! Whole-project validation entry point.

use crate::config::Config;
use crate::error::Result;
use crate::modules::ModuleRegistry;
use crate::rules::{Rule, ValidationContext};

use super::executor::ValidationEngine;
use super::report::ValidationReport;

/// Options for [`validate_project`] and hook dispatch.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Modules to activate. Every dependency must be listed too.
    ///
    /// When `None`, the modules owning the configuration's enabled rules
    /// are activated together with their dependencies.
    pub modules: Option<Vec<String>>,
}

impl ValidateOptions {
    pub fn with_modules<S: Into<String>>(modules: impl IntoIterator<Item = S>) -> Self {
        Self {
            modules: Some(modules.into_iter().map(Into::into).collect()),
        }
    }
}

/// Modules needed for the rules `config` enables, dependencies included.
///
/// Catalogue modules missing from the registry are left out.
pub fn modules_for_config(registry: &ModuleRegistry, config: &Config) -> Result<Vec<String>> {
    let owners: Vec<String> = registry
        .catalogue()
        .modules_for(&config.enabled_rules())
        .into_iter()
        .filter(|name| {
            let known = registry.contains(name);
            if !known {
                tracing::debug!(module = %name, "enabled rules belong to an unregistered module");
            }
            known
        })
        .collect();
    registry.dependency_closure(&owners)
}

/// Activate the modules `options` asks for, or those `config` implies.
pub fn activate_modules(
    registry: &mut ModuleRegistry,
    config: &Config,
    options: &ValidateOptions,
) -> Result<()> {
    let names = match &options.modules {
        Some(names) => names.clone(),
        None => modules_for_config(registry, config)?,
    };
    registry.activate(&names, config)?;
    tracing::info!(modules = ?registry.loaded_modules(), "modules active");
    Ok(())
}

/// The rules from `rules` that `config` enables, in the given order.
pub fn select_rules<'r>(config: &Config, rules: &[&'r Rule]) -> Vec<&'r Rule> {
    rules
        .iter()
        .copied()
        .filter(|r| config.is_rule_enabled(r.id.as_str()))
        .collect()
}

/// Activate modules, then run every rule the configuration enables.
///
/// # Errors
///
/// Activation errors (unknown module, missing dependency, cycle, duplicate
/// rule). Rule failures never surface here; they are warnings in the
/// report.
pub fn validate_project(
    registry: &mut ModuleRegistry,
    ctx: &ValidationContext,
    options: &ValidateOptions,
) -> Result<ValidationReport> {
    activate_modules(registry, ctx.config(), options)?;

    let active = registry.all_rules();
    let rules = select_rules(ctx.config(), &active);
    tracing::debug!(active = active.len(), selected = rules.len(), "selected rules");

    Ok(ValidationEngine::new().validate(ctx, &rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Catalogue;
    use crate::error::VibeError;
    use crate::rules::ProjectFile;
    use std::sync::Arc;

    fn registry() -> ModuleRegistry {
        ModuleRegistry::with_builtins(Arc::new(Catalogue::builtin().unwrap()))
    }

    #[test]
    fn modules_follow_enabled_rules() {
        let registry = registry();
        let catalogue = Catalogue::builtin().unwrap();
        let config = catalogue.apply_preset("minimal").unwrap();
        assert_eq!(modules_for_config(&registry, &config).unwrap(), vec!["core"]);

        let mut config = config;
        config.enable_rule("tst-001");
        assert_eq!(
            modules_for_config(&registry, &config).unwrap(),
            vec!["core", "testing"]
        );
    }

    #[test]
    fn only_enabled_rules_run() {
        let mut registry = registry();
        let config = Catalogue::builtin().unwrap().apply_preset("minimal").unwrap();
        let ctx = ValidationContext::new("/p", config)
            .with_files(vec![ProjectFile::new("README.md", "# Hi\n")]);

        let report = validate_project(&mut registry, &ctx, &ValidateOptions::default()).unwrap();
        assert_eq!(report.summary().total, 3);
        assert_eq!(registry.loaded_modules(), vec!["core"]);
    }

    #[test]
    fn explicit_modules_need_their_dependencies() {
        let mut registry = registry();
        let ctx = ValidationContext::for_tests();
        let err = validate_project(
            &mut registry,
            &ctx,
            &ValidateOptions::with_modules(["testing"]),
        )
        .unwrap_err();
        assert!(matches!(err, VibeError::DependencyViolation { .. }));
        assert!(registry.loaded_modules().is_empty());
    }

    #[test]
    fn select_keeps_order() {
        let registry = {
            let mut r = registry();
            r.activate(&["core"], &Config::default()).unwrap();
            r
        };
        let mut config = Config::default();
        config.enable_rule("doc-001");
        config.enable_rule("sec-001");
        let active = registry.all_rules();
        let ids: Vec<&str> = select_rules(&config, &active)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["sec-001", "doc-001"]);
    }
}
