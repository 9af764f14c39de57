//! The rule module capability contract.
//!
//! A [`RuleModule`] is a named, versioned bundle that can provide rules,
//! hooks and validators. Each capability is optional: a module registers
//! whatever it provides through the [`ModuleRegistrar`] handed to its
//! `initialize` call and nothing else. Once initialization returns, the
//! registrar is turned into an [`ActiveModule`] whose contents are frozen.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::{Catalogue, Config};
use crate::error::{Result, VibeError};
use crate::hooks::HookEvent;
use crate::rules::{Finding, Rule, RuleCheck, RuleId, ValidationContext};

/// Hook handler. `Ok(false)` rejects the event; an error is a rejection too.
pub type HookHandler = Box<dyn Fn(&ValidationContext) -> anyhow::Result<bool> + Send + Sync>;

/// Standalone named check, run on demand rather than as part of validation.
pub type Validator =
    Box<dyn Fn(&ValidationContext) -> anyhow::Result<Vec<Finding>> + Send + Sync>;

/// A hook bound to an event by a module.
pub struct RegisteredHook {
    /// Module that registered the hook.
    pub module: String,
    /// Hook name, for diagnostics.
    pub name: String,
    pub event: HookEvent,
    handler: HookHandler,
}

impl RegisteredHook {
    /// Run the handler.
    pub fn invoke(&self, ctx: &ValidationContext) -> anyhow::Result<bool> {
        (self.handler)(ctx)
    }
}

impl fmt::Debug for RegisteredHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredHook")
            .field("module", &self.module)
            .field("name", &self.name)
            .field("event", &self.event)
            .finish()
    }
}

/// A capability bundle of rules, hooks and validators.
pub trait RuleModule: Send + Sync {
    /// Unique module name.
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &str {
        ""
    }

    /// Names of modules that must be activated alongside (and before) this one.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Register this module's rules, hooks and validators.
    fn initialize(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<()>;
}

/// The only way a module can register anything.
pub struct ModuleRegistrar<'a> {
    module: String,
    catalogue: &'a Catalogue,
    config: &'a Config,
    rules: Vec<Rule>,
    hooks: Vec<RegisteredHook>,
    validators: BTreeMap<String, Validator>,
}

impl<'a> ModuleRegistrar<'a> {
    pub fn new(module: impl Into<String>, catalogue: &'a Catalogue, config: &'a Config) -> Self {
        Self {
            module: module.into(),
            catalogue,
            config,
            rules: Vec::new(),
            hooks: Vec::new(),
            validators: BTreeMap::new(),
        }
    }

    /// Configuration the module is being activated with.
    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn catalogue(&self) -> &Catalogue {
        self.catalogue
    }

    /// Register a fully built rule.
    ///
    /// The id must be shaped `category-NNN` and unique within the module.
    pub fn register_rule(&mut self, rule: Rule) -> Result<()> {
        if !RuleId::is_well_formed(rule.id.as_str()) {
            return Err(VibeError::InvalidRuleId {
                id: rule.id.to_string(),
                module: self.module.clone(),
            });
        }
        if self.rules.iter().any(|r| r.id == rule.id) {
            return Err(VibeError::DuplicateRule {
                id: rule.id.to_string(),
                module: self.module.clone(),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Register a check for a catalogued rule, taking its metadata from
    /// the catalogue.
    pub fn register_catalogued(
        &mut self,
        id: &str,
        check: impl Fn(&ValidationContext) -> anyhow::Result<Vec<Finding>> + Send + Sync + 'static,
    ) -> Result<()> {
        let rule = self.catalogued_rule(id, check)?;
        self.register_rule(rule)
    }

    /// Like [`register_catalogued`](Self::register_catalogued), with a fix.
    pub fn register_catalogued_with_fix(
        &mut self,
        id: &str,
        check: impl Fn(&ValidationContext) -> anyhow::Result<Vec<Finding>> + Send + Sync + 'static,
        fix: impl Fn(&ValidationContext) -> anyhow::Result<bool> + Send + Sync + 'static,
    ) -> Result<()> {
        let rule = self.catalogued_rule(id, check)?.with_fix(fix);
        self.register_rule(rule)
    }

    /// Register a [`RuleCheck`] implementation for a catalogued rule.
    pub fn register_catalogued_check(
        &mut self,
        id: &str,
        check: impl RuleCheck + 'static,
    ) -> Result<()> {
        let rule = self.catalogued_rule(id, check)?;
        self.register_rule(rule)
    }

    fn catalogued_rule(&self, id: &str, check: impl RuleCheck + 'static) -> Result<Rule> {
        let meta = self
            .catalogue
            .rule(id)
            .ok_or_else(|| VibeError::UnknownRule { id: id.to_string() })?;
        if meta.module != self.module {
            tracing::debug!(
                rule = id,
                module = %self.module,
                catalogued = %meta.module,
                "rule registered by a module other than the catalogued one"
            );
        }
        Ok(Rule::from_check(
            meta.id.clone(),
            meta.name.clone(),
            meta.level,
            meta.category.clone(),
            meta.severity,
            check,
        )
        .with_description(meta.description.clone()))
    }

    /// Bind a handler to an event.
    pub fn register_hook(
        &mut self,
        event: HookEvent,
        name: impl Into<String>,
        handler: impl Fn(&ValidationContext) -> anyhow::Result<bool> + Send + Sync + 'static,
    ) {
        self.hooks.push(RegisteredHook {
            module: self.module.clone(),
            name: name.into(),
            event,
            handler: Box::new(handler),
        });
    }

    /// Register a named validator. A later registration under the same
    /// name replaces the earlier one.
    pub fn register_validator(
        &mut self,
        name: impl Into<String>,
        validator: impl Fn(&ValidationContext) -> anyhow::Result<Vec<Finding>> + Send + Sync + 'static,
    ) {
        self.validators.insert(name.into(), Box::new(validator));
    }

    /// Freeze what was registered.
    pub fn finish(self, module: &dyn RuleModule) -> ActiveModule {
        ActiveModule {
            name: self.module,
            version: module.version().to_string(),
            description: module.description().to_string(),
            dependencies: module.dependencies(),
            rules: self.rules,
            hooks: self.hooks,
            validators: self.validators,
        }
    }
}

/// An initialized module. Read-only for the rest of the run.
pub struct ActiveModule {
    name: String,
    version: String,
    description: String,
    dependencies: Vec<String>,
    rules: Vec<Rule>,
    hooks: Vec<RegisteredHook>,
    validators: BTreeMap<String, Validator>,
}

impl ActiveModule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Rules in registration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Hooks for `event`, in registration order.
    pub fn hooks_for(&self, event: HookEvent) -> impl Iterator<Item = &RegisteredHook> {
        self.hooks.iter().filter(move |h| h.event == event)
    }

    pub fn hooks(&self) -> &[RegisteredHook] {
        &self.hooks
    }

    pub fn validator(&self, name: &str) -> Option<&Validator> {
        self.validators.get(name)
    }

    pub fn validator_names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }
}

impl fmt::Debug for ActiveModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveModule")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("rules", &self.rules.len())
            .field("hooks", &self.hooks)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
