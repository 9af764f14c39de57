//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands only gather inputs and
//! render results; decisions live in the engine and the dispatcher.

pub mod check;
pub mod config;
pub mod dispatcher;
pub mod hook;
pub mod validate;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, Workspace};
