//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::{Cli, Commands};
use crate::config::{Catalogue, Config, ConfigStore};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, writing user-facing output to `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success for `0`, failure otherwise.
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            Self::success()
        } else {
            Self::failure(exit_code)
        }
    }
}

/// What every command needs to know about the project.
#[derive(Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub catalogue: Arc<Catalogue>,
    pub use_color: bool,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, catalogue: Arc<Catalogue>) -> Self {
        Self {
            root: root.into(),
            catalogue,
            use_color: false,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::for_project(&self.root, Arc::clone(&self.catalogue))
    }

    /// The project configuration, or the standard preset when there is
    /// none on disk.
    pub fn config_or_standard(&self, ui: &mut dyn UserInterface) -> Result<Config> {
        let store = self.store();
        match store.load()? {
            Some(config) => Ok(config),
            None => {
                ui.warning(&format!(
                    "No {} found; using the standard preset",
                    store.path().display()
                ));
                self.catalogue.apply_preset("standard")
            }
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    workspace: Workspace,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given workspace.
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.workspace.root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let workspace = self.workspace.clone();
        match &cli.command {
            Commands::Validate(args) => {
                super::validate::ValidateCommand::new(workspace, args.clone()).execute(ui)
            }
            Commands::Hook(args) => {
                super::hook::HookCommand::new(workspace, args.clone()).execute(ui)
            }
            Commands::Check(args) => {
                super::check::CheckCommand::new(workspace, args.clone()).execute(ui)
            }
            Commands::Config(args) => {
                super::config::ConfigCommand::new(workspace, args.clone()).execute(ui)
            }
        }
    }
}

/// `None` for an empty module list, which means "derive from configuration".
pub(crate) fn requested_modules(modules: &[String]) -> Option<Vec<String>> {
    (!modules.is_empty()).then(|| modules.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::from_exit_code(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn missing_config_falls_back_to_standard() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path(), Arc::new(Catalogue::builtin().unwrap()));
        let mut ui = MockUI::new();

        let config = workspace.config_or_standard(&mut ui).unwrap();
        assert_eq!(config.enabled_rules().len(), 10);
        assert!(ui.has_warning("standard preset"));
    }

    #[test]
    fn empty_module_list_means_derived() {
        assert!(requested_modules(&[]).is_none());
        assert_eq!(
            requested_modules(&["core".to_string()]),
            Some(vec!["core".to_string()])
        );
    }
}
