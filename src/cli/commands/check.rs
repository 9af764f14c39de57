//! Check command implementation.
//!
//! `vibe-codex check <name>` runs one named validator on demand. Without a
//! name it lists the validators the active modules provide.

use crate::cli::args::CheckArgs;
use crate::cli::context::{build_context, ContextOptions};
use crate::engine::{activate_modules, ValidateOptions};
use crate::error::Result;
use crate::modules::ModuleRegistry;
use crate::ui::UserInterface;

use super::dispatcher::{requested_modules, Command, CommandResult, Workspace};

/// The check command implementation.
pub struct CheckCommand {
    workspace: Workspace,
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(workspace: Workspace, args: CheckArgs) -> Self {
        Self { workspace, args }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.workspace.config_or_standard(ui)?;
        let mut registry = ModuleRegistry::with_builtins(self.workspace.catalogue.clone());
        let options = ValidateOptions {
            modules: requested_modules(&self.args.modules),
        };
        activate_modules(&mut registry, &config, &options)?;

        let Some(name) = &self.args.name else {
            ui.show_header("Validators");
            for validator in registry.validator_names() {
                ui.message(&format!("  {}", validator));
            }
            return Ok(CommandResult::success());
        };

        let ctx = build_context(&self.workspace.root, config, ContextOptions::from_env())?;
        let findings = registry.run_validator(name, &ctx)?;
        for finding in &findings {
            match finding.location() {
                Some(location) => ui.message(&format!("{} ({})", finding.message, location)),
                None => ui.message(&finding.message),
            }
        }
        Ok(CommandResult::success())
    }
}
