//! Report output formatters.

pub mod human;
pub mod json;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::engine::ValidationReport;

/// Output format for validation reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected human or json)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => f.write_str("human"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Trait for formatting a validation report.
pub trait ReportFormatter {
    /// Write `report` to `writer`.
    fn format<W: Write + ?Sized>(
        &self,
        report: &ValidationReport,
        writer: &mut W,
    ) -> std::io::Result<()>;
}

/// Write `report` in `format`.
pub fn write_report<W: Write + ?Sized>(
    report: &ValidationReport,
    format: OutputFormat,
    use_color: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => HumanFormatter::new(use_color).format(report, writer),
        OutputFormat::Json => JsonFormatter::new().format(report, writer),
    }
}

pub use human::HumanFormatter;
pub use json::JsonFormatter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("human".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("sarif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "human");
    }
}
