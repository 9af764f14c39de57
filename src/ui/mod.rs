//! Terminal output.
//!
//! - [`UserInterface`] trait, so commands can be tested without a terminal
//! - [`TerminalUI`] for real runs
//! - [`MockUI`] capturing everything for assertions
//!
//! # Example
//!
//! ```
//! use vibe_codex::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Validating");
//! ui.success("All rules passed");
//!
//! assert!(ui.has_message("Validating"));
//! assert!(ui.has_success("passed"));
//! ```

pub mod mock;
pub mod terminal;
pub mod theme;

pub use mock::{MockUI, OutputKind};
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, Theme};

/// Trait for user-facing output.
pub trait UserInterface {
    /// Plain output (reports, JSON, listings).
    fn message(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    /// A section header.
    fn show_header(&mut self, title: &str);
}
