//! Command-line interface for vibe-codex.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations
//! - [`context`] - Builds a validation context from the working tree
//! - [`git`] - Read-only git queries

pub mod args;
pub mod commands;
pub mod context;
pub mod git;

pub use args::{CheckArgs, Cli, Commands, ConfigAction, ConfigArgs, HookArgs, ValidateArgs};
pub use commands::{Command, CommandDispatcher, CommandResult, Workspace};
pub use context::{build_context, ContextOptions};
