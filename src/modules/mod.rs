//! Rule modules and the registry that activates them.
//!
//! - [`RuleModule`] - The capability contract every module implements
//! - [`ModuleRegistrar`] - Registration handle passed to `initialize`
//! - [`ModuleRegistry`] - Known modules plus the active set for a run
//! - [`builtin`] - The modules that ship with vibe-codex

pub mod builtin;
pub mod graph;
pub mod module;
pub mod registry;

pub use graph::ModuleGraph;
pub use module::{
    ActiveModule, HookHandler, ModuleRegistrar, RegisteredHook, RuleModule, Validator,
};
pub use registry::ModuleRegistry;
