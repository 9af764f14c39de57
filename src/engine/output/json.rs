//! JSON report output for tooling and CI.

use std::io::Write;

use super::ReportFormatter;
use crate::engine::ValidationReport;

/// Formats a report as pretty-printed JSON.
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write + ?Sized>(
        &self,
        report: &ValidationReport,
        writer: &mut W,
    ) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)
    }
}
