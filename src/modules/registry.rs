//! Module registry and activation.
//!
//! The registry is an explicit value: construct one per run (or per test),
//! register modules, then activate the subset a run needs.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{Catalogue, Config};
use crate::error::{Result, VibeError};
use crate::hooks::HookEvent;
use crate::modules::builtin;
use crate::modules::graph::ModuleGraph;
use crate::modules::module::{ActiveModule, ModuleRegistrar, RegisteredHook, RuleModule, Validator};
use crate::rules::{Finding, Rule, ValidationContext};

/// Known modules plus the currently active set.
pub struct ModuleRegistry {
    catalogue: Arc<Catalogue>,
    modules: Vec<Box<dyn RuleModule>>,
    active: Vec<ActiveModule>,
}

impl ModuleRegistry {
    /// An empty registry.
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self {
            catalogue,
            modules: Vec::new(),
            active: Vec::new(),
        }
    }

    /// A registry with every built-in module registered.
    pub fn with_builtins(catalogue: Arc<Catalogue>) -> Self {
        let mut registry = Self::new(catalogue);
        registry.modules = builtin::all();
        registry
    }

    /// Add a module to the known set.
    pub fn register(&mut self, module: impl RuleModule + 'static) -> Result<()> {
        if self.contains(module.name()) {
            return Err(VibeError::DuplicateModule {
                name: module.name().to_string(),
            });
        }
        self.modules.push(Box::new(module));
        Ok(())
    }

    /// Whether a module with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Names of all registered modules, in registration order.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    fn find(&self, name: &str) -> Option<&dyn RuleModule> {
        self.modules
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.as_ref())
    }

    fn require(&self, name: &str) -> Result<&dyn RuleModule> {
        self.find(name).ok_or_else(|| VibeError::UnknownModule {
            name: name.to_string(),
        })
    }

    /// `names` plus everything they transitively depend on.
    ///
    /// Requested names keep their order; dependencies are appended.
    pub fn dependency_closure<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        let mut closure: Vec<String> = Vec::new();
        let mut pending: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        pending.reverse();

        while let Some(name) = pending.pop() {
            if closure.contains(&name) {
                continue;
            }
            let module = self.require(&name)?;
            for dep in module.dependencies().into_iter().rev() {
                pending.insert(0, dep);
            }
            closure.push(name);
        }

        Ok(closure)
    }

    /// Activate exactly the named modules.
    ///
    /// Every dependency of a requested module must also be requested.
    /// Modules are initialized dependencies first. On any error nothing
    /// changes: the previously active set stays in place.
    ///
    /// # Errors
    ///
    /// `UnknownModule`, `DependencyViolation`, `CircularDependency`,
    /// `DuplicateRule`, or whatever a module's initialization returns.
    pub fn activate<S: AsRef<str>>(&mut self, names: &[S], config: &Config) -> Result<()> {
        let mut requested: Vec<&str> = Vec::new();
        for name in names.iter().map(AsRef::as_ref) {
            if !requested.contains(&name) {
                requested.push(name);
            }
        }

        let mut graph = ModuleGraph::new();
        for name in &requested {
            let module = self.require(name)?;
            let dependencies = module.dependencies();
            if let Some(missing) = dependencies.iter().find(|d| !requested.contains(&d.as_str())) {
                return Err(VibeError::DependencyViolation {
                    module: name.to_string(),
                    missing: missing.clone(),
                });
            }
            graph.add(*name, dependencies);
        }

        let order = graph.activation_order()?;

        let mut active: Vec<ActiveModule> = Vec::with_capacity(order.len());
        let mut rule_ids: HashSet<String> = HashSet::new();
        for name in &order {
            let module = self.require(name)?;
            let mut registrar = ModuleRegistrar::new(name.as_str(), &self.catalogue, config);
            module.initialize(&mut registrar)?;
            let initialized = registrar.finish(module);

            for rule in initialized.rules() {
                if !rule_ids.insert(rule.id.to_string()) {
                    return Err(VibeError::DuplicateRule {
                        id: rule.id.to_string(),
                        module: name.clone(),
                    });
                }
            }

            tracing::debug!(
                module = %name,
                rules = initialized.rules().len(),
                hooks = initialized.hooks().len(),
                "activated module"
            );
            active.push(initialized);
        }

        self.active = active;
        Ok(())
    }

    /// Every rule from every active module, in activation then
    /// registration order.
    pub fn all_rules(&self) -> Vec<&Rule> {
        self.active.iter().flat_map(|m| m.rules()).collect()
    }

    /// Names of active modules, in activation order.
    pub fn loaded_modules(&self) -> Vec<&str> {
        self.active.iter().map(|m| m.name()).collect()
    }

    pub fn active_modules(&self) -> &[ActiveModule] {
        &self.active
    }

    /// Hooks for `event` across active modules, in activation order.
    pub fn hooks_for(&self, event: HookEvent) -> Vec<&RegisteredHook> {
        self.active.iter().flat_map(|m| m.hooks_for(event)).collect()
    }

    /// A validator by name; the first active module providing it wins.
    pub fn validator(&self, name: &str) -> Option<&Validator> {
        self.active.iter().find_map(|m| m.validator(name))
    }

    /// Names of all validators across active modules.
    pub fn validator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .active
            .iter()
            .flat_map(|m| m.validator_names())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Run a validator by name.
    pub fn run_validator(&self, name: &str, ctx: &ValidationContext) -> Result<Vec<Finding>> {
        let validator = self.validator(name).ok_or_else(|| VibeError::UnknownValidator {
            name: name.to_string(),
        })?;
        validator(ctx).map_err(VibeError::Other)
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Shared handle to the catalogue.
    pub fn catalogue_handle(&self) -> Arc<Catalogue> {
        Arc::clone(&self.catalogue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Level, Severity};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestModule {
        name: &'static str,
        deps: Vec<&'static str>,
        rule: Option<&'static str>,
        init_order: Option<Arc<std::sync::Mutex<Vec<String>>>>,
        inits: Arc<AtomicUsize>,
    }

    impl TestModule {
        fn new(name: &'static str, deps: Vec<&'static str>) -> Self {
            Self {
                name,
                deps,
                rule: None,
                init_order: None,
                inits: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn with_rule(mut self, id: &'static str) -> Self {
            self.rule = Some(id);
            self
        }
    }

    impl RuleModule for TestModule {
        fn name(&self) -> &str {
            self.name
        }

        fn dependencies(&self) -> Vec<String> {
            self.deps.iter().map(|d| d.to_string()).collect()
        }

        fn initialize(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<()> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            if let Some(order) = &self.init_order {
                order.lock().unwrap().push(self.name.to_string());
            }
            if let Some(id) = self.rule {
                registrar.register_rule(Rule::new(
                    id,
                    id,
                    Level::new(1).unwrap(),
                    "test",
                    Severity::Error,
                    |_: &ValidationContext| Ok(vec![]),
                ))?;
            }
            registrar.register_hook(HookEvent::PreCommit, self.name, |_| Ok(true));
            Ok(())
        }
    }

    fn registry() -> ModuleRegistry {
        ModuleRegistry::new(Arc::new(Catalogue::builtin().unwrap()))
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = registry();
        registry.register(TestModule::new("a", vec![])).unwrap();
        let err = registry.register(TestModule::new("a", vec![])).unwrap_err();
        assert!(matches!(err, VibeError::DuplicateModule { .. }));
    }

    #[test]
    fn unknown_module_fails_activation() {
        let mut registry = registry();
        let err = registry.activate(&["ghost"], &Config::default()).unwrap_err();
        assert!(matches!(err, VibeError::UnknownModule { .. }));
    }

    #[test]
    fn malformed_rule_id_fails_activation() {
        let mut registry = registry();
        registry
            .register(TestModule::new("bad", vec![]).with_rule("Not A Rule Id"))
            .unwrap();

        let err = registry.activate(&["bad"], &Config::default()).unwrap_err();
        match err {
            VibeError::InvalidRuleId { id, module } => {
                assert_eq!(id, "Not A Rule Id");
                assert_eq!(module, "bad");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(registry.loaded_modules().is_empty());
        assert!(registry.all_rules().is_empty());
    }

    #[test]
    fn missing_dependency_names_both_modules() {
        let mut registry = registry();
        registry.register(TestModule::new("base", vec![])).unwrap();
        registry.register(TestModule::new("child", vec!["base"])).unwrap();

        let err = registry.activate(&["child"], &Config::default()).unwrap_err();
        match err {
            VibeError::DependencyViolation { module, missing } => {
                assert_eq!(module, "child");
                assert_eq!(missing, "base");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(registry.loaded_modules().is_empty());
    }

    #[test]
    fn dependencies_initialize_first() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut registry = registry();
        let mut child = TestModule::new("child", vec!["base"]);
        child.init_order = Some(order.clone());
        let mut base = TestModule::new("base", vec![]);
        base.init_order = Some(order.clone());
        registry.register(child).unwrap();
        registry.register(base).unwrap();

        registry.activate(&["child", "base"], &Config::default()).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["base", "child"]);
        assert_eq!(registry.loaded_modules(), vec!["base", "child"]);
    }

    #[test]
    fn cycles_are_fatal() {
        let mut registry = registry();
        registry.register(TestModule::new("a", vec!["b"])).unwrap();
        registry.register(TestModule::new("b", vec!["a"])).unwrap();
        let err = registry.activate(&["a", "b"], &Config::default()).unwrap_err();
        assert!(matches!(err, VibeError::CircularDependency { .. }));
    }

    #[test]
    fn rules_are_flattened_in_activation_order() {
        let mut registry = registry();
        registry
            .register(TestModule::new("a", vec!["b"]).with_rule("aaa-001"))
            .unwrap();
        registry
            .register(TestModule::new("b", vec![]).with_rule("bbb-001"))
            .unwrap();
        registry.activate(&["a", "b"], &Config::default()).unwrap();

        let ids: Vec<String> = registry.all_rules().iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["bbb-001", "aaa-001"]);

        let hooks: Vec<&str> = registry
            .hooks_for(HookEvent::PreCommit)
            .iter()
            .map(|h| h.module.as_str())
            .collect();
        assert_eq!(hooks, vec!["b", "a"]);
    }

    #[test]
    fn duplicate_rules_across_modules_leave_previous_state() {
        let mut registry = registry();
        registry
            .register(TestModule::new("a", vec![]).with_rule("dup-001"))
            .unwrap();
        registry
            .register(TestModule::new("b", vec![]).with_rule("dup-001"))
            .unwrap();
        registry.register(TestModule::new("c", vec![])).unwrap();

        registry.activate(&["c"], &Config::default()).unwrap();
        let err = registry.activate(&["a", "b"], &Config::default()).unwrap_err();
        assert!(matches!(err, VibeError::DuplicateRule { .. }));
        assert_eq!(registry.loaded_modules(), vec!["c"]);
    }

    #[test]
    fn module_without_rules_still_loads() {
        let mut registry = registry();
        registry.register(TestModule::new("quiet", vec![])).unwrap();
        registry.activate(&["quiet"], &Config::default()).unwrap();
        assert_eq!(registry.loaded_modules(), vec!["quiet"]);
        assert!(registry.all_rules().is_empty());
    }

    #[test]
    fn closure_pulls_in_dependencies() {
        let mut registry = registry();
        registry.register(TestModule::new("base", vec![])).unwrap();
        registry.register(TestModule::new("mid", vec!["base"])).unwrap();
        registry.register(TestModule::new("top", vec!["mid"])).unwrap();

        let closure = registry.dependency_closure(&["top"]).unwrap();
        assert_eq!(closure, vec!["top", "mid", "base"]);
        registry.activate(&closure, &Config::default()).unwrap();
        assert_eq!(registry.loaded_modules(), vec!["base", "mid", "top"]);
    }

    #[test]
    fn each_activation_initializes_once() {
        let module = TestModule::new("once", vec![]);
        let inits = module.inits.clone();
        let mut registry = registry();
        registry.register(module).unwrap();
        registry.activate(&["once", "once"], &Config::default()).unwrap();
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_validator_is_an_error() {
        let registry = registry();
        let ctx = ValidationContext::for_tests();
        let err = registry.run_validator("nope", &ctx).unwrap_err();
        assert!(matches!(err, VibeError::UnknownValidator { .. }));
    }

    #[test]
    fn builtins_are_registered() {
        let registry = ModuleRegistry::with_builtins(Arc::new(Catalogue::builtin().unwrap()));
        for name in ["core", "github-workflow", "testing", "documentation", "quality", "deployment"] {
            assert!(registry.contains(name), "missing {name}");
        }
    }
}
