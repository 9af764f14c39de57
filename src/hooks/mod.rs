//! Git lifecycle events and hook dispatch.
//!
//! - [`HookEvent`] - The five supported git events
//! - [`HookDispatcher`] - Runs hooks for one event, fail-fast
//! - [`dispatch_event`] - Activate modules from configuration and dispatch

pub mod dispatcher;
pub mod event;

pub use dispatcher::{dispatch_event, DispatchOutcome, HookDispatcher};
pub use event::HookEvent;
