//! Terminal styling for human-readable output.

use console::Style;

/// Styles used by the human formatter and command output.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Passed rules, accepted hooks (green).
    pub success: Style,
    /// Warnings (orange).
    pub warning: Style,
    /// Violations and rejections (red bold).
    pub error: Style,
    /// Rule ids and counters (magenta).
    pub info: Style,
    /// Locations and secondary text.
    pub dim: Style,
    pub header: Style,
    styled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            info: Style::new().magenta(),
            dim: Style::new().dim(),
            header: Style::new().bold().magenta(),
            styled: true,
        }
    }

    /// A theme without colors (for non-TTY or `--no-color`).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            styled: false,
        }
    }

    /// Pick [`Theme::new`] or [`Theme::plain`].
    pub fn for_color(use_color: bool) -> Self {
        if use_color {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Whether this theme emits any styling.
    pub fn is_styled(&self) -> bool {
        self.styled
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }
}

/// Whether colored output should be used.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_keeps_icons() {
        let theme = Theme::plain();
        assert_eq!(theme.format_success("ok"), "✓ ok");
        assert_eq!(theme.format_warning("hm"), "⚠ hm");
        assert_eq!(theme.format_error("no"), "✗ no");
    }
}
