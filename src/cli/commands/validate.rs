//! Validate command implementation.
//!
//! The `vibe-codex validate` command runs every enabled rule and prints
//! the report.

use crate::cli::args::ValidateArgs;
use crate::cli::context::{build_context, ContextOptions};
use crate::engine::output::write_report;
use crate::engine::{
    select_rules, validate_project, FixEngine, OutputFormat, ValidateOptions, ValidationEngine,
    ValidationReport,
};
use crate::error::Result;
use crate::modules::ModuleRegistry;
use crate::ui::UserInterface;

use super::dispatcher::{requested_modules, Command, CommandResult, Workspace};

/// The validate command implementation.
pub struct ValidateCommand {
    workspace: Workspace,
    args: ValidateArgs,
}

impl ValidateCommand {
    pub fn new(workspace: Workspace, args: ValidateArgs) -> Self {
        Self { workspace, args }
    }

    fn render(&self, report: &ValidationReport, ui: &mut dyn UserInterface) -> Result<()> {
        let mut buffer = Vec::new();
        write_report(report, self.args.format, self.workspace.use_color, &mut buffer)?;
        ui.message(String::from_utf8_lossy(&buffer).trim_end());
        Ok(())
    }
}

impl Command for ValidateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.workspace.config_or_standard(ui)?;
        let root = &self.workspace.root;
        let ctx = build_context(root, config.clone(), ContextOptions::from_env())?;

        let mut registry = ModuleRegistry::with_builtins(self.workspace.catalogue.clone());
        let options = ValidateOptions {
            modules: requested_modules(&self.args.modules),
        };
        let mut report = validate_project(&mut registry, &ctx, &options)?;

        if self.args.fix && report.summary().total > report.summary().passed {
            let active = registry.all_rules();
            let rules = select_rules(ctx.config(), &active);
            let result = FixEngine::new().apply(&ctx, &rules, &report);

            let human = self.args.format == OutputFormat::Human;
            for id in &result.fixed {
                if human {
                    ui.success(&format!("Fixed {}", id));
                }
            }
            for (id, error) in &result.errors {
                if human {
                    ui.error(&format!("Fix for {} failed: {}", id, error));
                }
            }

            if !result.fixed.is_empty() {
                let ctx = build_context(root, config, ContextOptions::from_env())?;
                report = ValidationEngine::new().validate(&ctx, &rules);
            }
        }

        self.render(&report, ui)?;
        Ok(CommandResult::from_exit_code(report.exit_code()))
    }
}
