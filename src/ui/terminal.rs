//! Terminal UI.

use std::io::Write;

use console::Term;

use super::{should_use_colors, Theme, UserInterface};

/// Writes to stdout, styled unless colors are off.
pub struct TerminalUI {
    term: Term,
    theme: Theme,
}

impl TerminalUI {
    /// Create a terminal UI. `no_color` forces plain output.
    pub fn new(no_color: bool) -> Self {
        Self {
            term: Term::stdout(),
            theme: Theme::for_color(!no_color && should_use_colors()),
        }
    }

    /// Whether output is styled.
    pub fn uses_color(&self) -> bool {
        self.theme.is_styled()
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.term, "{}", self.theme.format_header(title)).ok();
    }
}
