//! Config command implementation.
//!
//! The `vibe-codex config` command shows, migrates and creates the
//! project configuration and lists the rule catalogue.

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{
    json_schema, migrate_with_report, needs_migration, validate_config, CURRENT_VERSION,
};
use crate::error::{Result, VibeError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Workspace};

/// The config command implementation.
pub struct ConfigCommand {
    workspace: Workspace,
    args: ConfigArgs,
}

impl ConfigCommand {
    pub fn new(workspace: Workspace, args: ConfigArgs) -> Self {
        Self { workspace, args }
    }

    fn show(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = self.workspace.store();
        let Some(config) = store.load()? else {
            ui.error(&format!(
                "No {} found. Run 'vibe-codex config preset standard' first.",
                store.path().display()
            ));
            return Ok(CommandResult::failure(2));
        };
        ui.message(&serde_json::to_string_pretty(&config)?);
        Ok(CommandResult::success())
    }

    fn migrate(&self, dry_run: bool, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = self.workspace.store();
        let Some(value) = store.load_value()? else {
            ui.error(&format!("No {} found", store.path().display()));
            return Ok(CommandResult::failure(2));
        };

        if !needs_migration(&value) {
            ui.success(&format!("Configuration is already at version {}", CURRENT_VERSION));
            return Ok(CommandResult::success());
        }

        let outcome = migrate_with_report(&value)?;
        ui.show_header(&format!(
            "Migrating from version {} to {}",
            outcome.from_major, CURRENT_VERSION
        ));
        ui.message(&format!("Enabled rules: {}", outcome.enabled_rules.join(", ")));
        for key in &outcome.unmapped {
            ui.warning(&format!("Setting '{}' has no equivalent rule", key));
        }
        if outcome.used_fallback {
            ui.warning("No settings mapped to rules; the standard preset was applied");
        }

        if dry_run {
            ui.message("Dry run: nothing written");
            return Ok(CommandResult::success());
        }

        let config =
            validate_config(&outcome.config).map_err(|errors| VibeError::ConfigValidationError {
                message: errors.to_string(),
            })?;
        store.save(config)?;
        ui.success(&format!("Wrote {}", store.path().display()));
        Ok(CommandResult::success())
    }

    fn rules(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.workspace.store().load()?;
        let catalogue = &self.workspace.catalogue;

        for (key, category) in catalogue.categories() {
            let rules: Vec<_> = catalogue
                .rules()
                .iter()
                .filter(|r| &r.category == key)
                .collect();
            if rules.is_empty() {
                continue;
            }
            ui.show_header(&format!("{} {}", category.icon, category.name));
            for rule in rules {
                let state = match &config {
                    Some(c) if c.is_rule_enabled(rule.id.as_str()) => "enabled",
                    Some(_) => "disabled",
                    None => "-",
                };
                ui.message(&format!(
                    "  {}  L{} {:<7} {:<8} {}",
                    rule.id,
                    rule.level,
                    rule.severity.to_string(),
                    state,
                    rule.name
                ));
            }
        }
        Ok(CommandResult::success())
    }

    fn preset(
        &self,
        name: &str,
        force: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let config = self.workspace.catalogue.apply_preset(name)?;
        let store = self.workspace.store();
        if store.exists() && !force {
            ui.error(&format!(
                "{} already exists; pass --force to overwrite it",
                store.path().display()
            ));
            return Ok(CommandResult::failure(1));
        }

        let saved = store.save(config)?;
        ui.success(&format!(
            "Wrote {} with the {} preset ({} rules)",
            store.path().display(),
            name,
            saved.enabled_rules().len()
        ));
        Ok(CommandResult::success())
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.action {
            ConfigAction::Show => self.show(ui),
            ConfigAction::Migrate { dry_run } => self.migrate(*dry_run, ui),
            ConfigAction::Schema => {
                ui.message(&serde_json::to_string_pretty(&json_schema())?);
                Ok(CommandResult::success())
            }
            ConfigAction::Rules => self.rules(ui),
            ConfigAction::Preset { name, force } => self.preset(name, *force, ui),
        }
    }
}
