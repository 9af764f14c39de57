//! The `quality` module: leftover debugging and work markers.

use std::path::Path;

use super::PatternCheck;
use crate::error::Result;
use crate::hooks::HookEvent;
use crate::modules::module::{ModuleRegistrar, RuleModule};
use crate::scanner::{debug_patterns, is_source_file, is_test_file, todo_patterns, PatternMatch};

/// Debug statements and TODO markers.
pub struct QualityModule;

impl RuleModule for QualityModule {
    fn name(&self) -> &str {
        "quality"
    }

    fn description(&self) -> &str {
        "Debug statements and TODO markers left in code"
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["core".to_string()]
    }

    fn initialize(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<()> {
        registrar.register_catalogued_check("qua-001", debug_check())?;
        registrar.register_catalogued_check("qua-002", todo_check())?;

        let todos = todo_check();
        registrar.register_hook(HookEvent::PostCommit, "todo-report", move |ctx| {
            let count = todos.matches(ctx).len();
            if count > 0 {
                tracing::info!(count, "TODO markers in the codebase");
            }
            Ok(true)
        });

        Ok(())
    }
}

fn debug_check() -> PatternCheck {
    PatternCheck::new(debug_patterns(), is_source_file, debug_message)
}

fn todo_check() -> PatternCheck {
    PatternCheck::new(todo_patterns(), is_code_file, todo_message)
}

fn is_code_file(path: &Path) -> bool {
    is_source_file(path) || is_test_file(path)
}

fn debug_message(m: &PatternMatch) -> String {
    format!("Debug statement left in code ({})", m.matched.trim())
}

fn todo_message(m: &PatternMatch) -> String {
    format!("{} marker", m.matched)
}
