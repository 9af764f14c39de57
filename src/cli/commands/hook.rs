//! Hook command implementation.
//!
//! `vibe-codex hook <event>` is what installed git hooks call. A non-zero
//! exit status makes git abort blocking events.

use crate::cli::args::HookArgs;
use crate::cli::context::{build_context, ContextOptions};
use crate::engine::ValidateOptions;
use crate::error::Result;
use crate::hooks::{dispatch_event, HookEvent};
use crate::modules::ModuleRegistry;
use crate::ui::UserInterface;

use super::dispatcher::{requested_modules, Command, CommandResult, Workspace};

/// The hook command implementation.
pub struct HookCommand {
    workspace: Workspace,
    args: HookArgs,
}

impl HookCommand {
    pub fn new(workspace: Workspace, args: HookArgs) -> Self {
        Self { workspace, args }
    }
}

impl Command for HookCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        // Fail on a bad event name before touching configuration.
        let event: HookEvent = self.args.event.parse()?;

        let config = self.workspace.config_or_standard(ui)?;
        let mut options = ContextOptions::from_env();
        if let Some(path) = &self.args.message_file {
            options = options.with_message_file(&self.workspace.root.join(path))?;
        }
        let ctx = build_context(&self.workspace.root, config, options)?;

        let mut registry = ModuleRegistry::with_builtins(self.workspace.catalogue.clone());
        let validate_options = ValidateOptions {
            modules: requested_modules(&self.args.modules),
        };
        let outcome = dispatch_event(&mut registry, event.as_str(), &ctx, &validate_options)?;

        if outcome.accepted {
            if outcome.hooks_run > 0 {
                ui.success(&format!("{}: {} hook(s) passed", event, outcome.hooks_run));
            }
        } else {
            let module = outcome.rejected_by.as_deref().unwrap_or("unknown");
            let hook = outcome.hook.as_deref().unwrap_or("unknown");
            ui.error(&format!("{} rejected by {} ({})", event, module, hook));
            if let Some(error) = &outcome.error {
                ui.error(error);
            }
            if !event.is_blocking() {
                ui.warning(&format!("{} cannot stop git; the operation already happened", event));
            }
        }

        Ok(CommandResult::from_exit_code(outcome.exit_code()))
    }
}
