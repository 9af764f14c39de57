//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::OutputFormat;

/// vibe-codex - Project policy rules for git workflows.
#[derive(Debug, Parser)]
#[command(name = "vibe-codex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Rule catalogue to use instead of the built-in one
    #[arg(long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the project against the enabled rules
    Validate(ValidateArgs),

    /// Run the hooks registered for a git event
    Hook(HookArgs),

    /// Run a named validator, or list the available ones
    Check(CheckArgs),

    /// Inspect, migrate or create the configuration
    Config(ConfigArgs),
}

/// Arguments for the `validate` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ValidateArgs {
    /// Activate exactly these modules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub modules: Vec<String>,

    /// Output format (human, json)
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Apply available fixes, then validate again
    #[arg(long)]
    pub fix: bool,
}

/// Arguments for the `hook` command.
#[derive(Debug, Clone, clap::Args)]
pub struct HookArgs {
    /// Git event (pre-commit, commit-msg, pre-push, post-commit, post-merge)
    pub event: String,

    /// File holding the pending commit message (for commit-msg)
    #[arg(long, value_name = "PATH")]
    pub message_file: Option<PathBuf>,

    /// Activate exactly these modules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub modules: Vec<String>,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Validator to run; lists validators when omitted
    pub name: Option<String>,

    /// Activate exactly these modules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub modules: Vec<String>,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// `config` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the configuration as JSON
    Show,

    /// Upgrade an older configuration to the current schema
    Migrate {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the configuration JSON Schema
    Schema,

    /// List catalogued rules and whether each is enabled
    Rules,

    /// Write a configuration from a preset (minimal, standard, strict)
    Preset {
        /// Preset name
        name: String,

        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}
