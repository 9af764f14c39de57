//! vibe-codex CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vibe_codex::cli::{Cli, CommandDispatcher, Workspace};
use vibe_codex::config::Catalogue;
use vibe_codex::ui::{TerminalUI, UserInterface};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("vibe_codex=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vibe_codex=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("vibe-codex starting with args: {:?}", cli);

    let mut ui = TerminalUI::new(cli.no_color);

    let project_root = cli
        .project
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let catalogue = match &cli.registry {
        Some(path) => Catalogue::load(path),
        None => Catalogue::builtin(),
    };
    let catalogue = match catalogue {
        Ok(catalogue) => Arc::new(catalogue),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(2);
        }
    };

    let workspace = Workspace::new(project_root, catalogue).with_color(ui.uses_color());
    let dispatcher = CommandDispatcher::new(workspace);

    match dispatcher.dispatch(&cli, &mut ui) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
