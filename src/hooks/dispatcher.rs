//! Event dispatch to module hooks.

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::engine::executor::panic_message;
use crate::engine::{activate_modules, ValidateOptions};
use crate::error::Result;
use crate::modules::{ModuleRegistry, RegisteredHook};
use crate::rules::ValidationContext;

use super::event::HookEvent;

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub event: HookEvent,
    /// `false` when any hook rejected the event.
    pub accepted: bool,
    /// Module whose hook rejected the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
    /// Name of the rejecting hook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    /// Error text when the rejection came from a failing hook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Hooks invoked, including the rejecting one.
    pub hooks_run: usize,
}

impl DispatchOutcome {
    fn accepted(event: HookEvent, hooks_run: usize) -> Self {
        Self {
            event,
            accepted: true,
            rejected_by: None,
            hook: None,
            error: None,
            hooks_run,
        }
    }

    fn rejected(
        event: HookEvent,
        hook: &RegisteredHook,
        error: Option<String>,
        hooks_run: usize,
    ) -> Self {
        Self {
            event,
            accepted: false,
            rejected_by: Some(hook.module.clone()),
            hook: Some(hook.name.clone()),
            error,
            hooks_run,
        }
    }

    /// Process exit status: `1` when rejected.
    pub fn exit_code(&self) -> i32 {
        if self.accepted {
            0
        } else {
            1
        }
    }
}

/// Runs the hooks active modules registered for an event.
pub struct HookDispatcher<'r> {
    registry: &'r ModuleRegistry,
}

impl<'r> HookDispatcher<'r> {
    pub fn new(registry: &'r ModuleRegistry) -> Self {
        Self { registry }
    }

    /// Run the hooks for `event` in activation order, stopping at the first
    /// rejection. Events switched off in configuration run nothing.
    pub fn dispatch(&self, event: HookEvent, ctx: &ValidationContext) -> DispatchOutcome {
        if !ctx.config().is_hook_enabled(event) {
            tracing::info!(%event, "hook event disabled in configuration");
            return DispatchOutcome::accepted(event, 0);
        }

        let hooks = self.registry.hooks_for(event);
        tracing::debug!(%event, hooks = hooks.len(), "dispatching");

        for (index, hook) in hooks.iter().enumerate() {
            let hooks_run = index + 1;
            match panic::catch_unwind(AssertUnwindSafe(|| hook.invoke(ctx))) {
                Ok(Ok(true)) => {}
                Ok(Ok(false)) => {
                    tracing::info!(%event, module = %hook.module, hook = %hook.name, "rejected");
                    return DispatchOutcome::rejected(event, hook, None, hooks_run);
                }
                Ok(Err(e)) => {
                    let message = format!("{:#}", e);
                    tracing::error!(
                        %event,
                        module = %hook.module,
                        hook = %hook.name,
                        error = %message,
                        "hook failed"
                    );
                    return DispatchOutcome::rejected(event, hook, Some(message), hooks_run);
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(
                        %event,
                        module = %hook.module,
                        hook = %hook.name,
                        error = %message,
                        "hook failed"
                    );
                    return DispatchOutcome::rejected(event, hook, Some(message), hooks_run);
                }
            }
        }

        DispatchOutcome::accepted(event, hooks.len())
    }

    /// [`dispatch`](Self::dispatch) by git hook name.
    ///
    /// # Errors
    ///
    /// `UnknownHookEvent` when `name` is not one of the five events.
    pub fn dispatch_named(&self, name: &str, ctx: &ValidationContext) -> Result<DispatchOutcome> {
        let event: HookEvent = name.parse()?;
        Ok(self.dispatch(event, ctx))
    }
}

/// Activate modules like `validate_project` does, then dispatch `name`.
pub fn dispatch_event(
    registry: &mut ModuleRegistry,
    name: &str,
    ctx: &ValidationContext,
    options: &ValidateOptions,
) -> Result<DispatchOutcome> {
    let event: HookEvent = name.parse()?;
    activate_modules(registry, ctx.config(), options)?;
    Ok(HookDispatcher::new(registry).dispatch(event, ctx))
}
