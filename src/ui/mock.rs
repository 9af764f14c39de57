//! Mock UI for testing.
//!
//! `MockUI` implements [`UserInterface`] and keeps a transcript of every
//! call, in order, for later assertion.

use super::UserInterface;

/// Kind of a captured line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Message,
    Success,
    Warning,
    Error,
    Header,
}

/// Captures all UI interactions.
#[derive(Debug, Default)]
pub struct MockUI {
    transcript: Vec<(OutputKind, String)>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written, in call order.
    pub fn transcript(&self) -> &[(OutputKind, String)] {
        &self.transcript
    }

    /// Lines of one kind, in call order.
    pub fn lines(&self, kind: OutputKind) -> Vec<&str> {
        self.transcript
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, line)| line.as_str())
            .collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.lines(OutputKind::Message)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.lines(OutputKind::Header)
    }

    /// Whether a line of `kind` contains `needle`.
    pub fn contains(&self, kind: OutputKind, needle: &str) -> bool {
        self.transcript
            .iter()
            .any(|(k, line)| *k == kind && line.contains(needle))
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.contains(OutputKind::Message, needle)
    }

    pub fn has_success(&self, needle: &str) -> bool {
        self.contains(OutputKind::Success, needle)
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        self.contains(OutputKind::Warning, needle)
    }

    pub fn has_error(&self, needle: &str) -> bool {
        self.contains(OutputKind::Error, needle)
    }

    fn push(&mut self, kind: OutputKind, line: &str) {
        self.transcript.push((kind, line.to_string()));
    }
}

impl UserInterface for MockUI {
    fn message(&mut self, msg: &str) {
        self.push(OutputKind::Message, msg);
    }

    fn success(&mut self, msg: &str) {
        self.push(OutputKind::Success, msg);
    }

    fn warning(&mut self, msg: &str) {
        self.push(OutputKind::Warning, msg);
    }

    fn error(&mut self, msg: &str) {
        self.push(OutputKind::Error, msg);
    }

    fn show_header(&mut self, title: &str) {
        self.push(OutputKind::Header, title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_call_order() {
        let mut ui = MockUI::new();
        ui.show_header("Rules");
        ui.message("plain");
        ui.warning("careful");
        ui.error("broken");

        assert_eq!(ui.messages(), vec!["plain"]);
        assert_eq!(ui.transcript()[0], (OutputKind::Header, "Rules".to_string()));
        assert_eq!(ui.transcript()[2].0, OutputKind::Warning);
        assert!(ui.has_warning("care"));
        assert!(ui.has_error("broken"));
        assert!(!ui.has_success("plain"));
        assert_eq!(ui.headers().len(), 1);
    }
}
