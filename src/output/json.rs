//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of run reports
//! - Summary counts for quick inspection

use crate::orchestrator::RunReport;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn summary(report: &RunReport) -> JsonSummary {
        JsonSummary {
            local_packages: report.local_packages,
            queried: report.queried,
            upgrades: report.actions.len(),
            failed_downloads: report.failed_downloads(),
            skips: report.skips.len(),
        }
    }
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Distinct packages found locally
    local_packages: usize,
    /// Packages queried on the index
    queried: usize,
    /// Planned upgrades
    upgrades: usize,
    /// Downloads that failed
    failed_downloads: usize,
    /// Packages skipped
    skips: usize,
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Summary statistics
    summary: JsonSummary,
    /// The report itself
    #[serde(flatten)]
    report: &'a RunReport,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        // Quiet mode only emits the summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(report, writer);
        }

        let output = JsonOutput {
            summary: Self::summary(report),
            report,
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_summary(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let json =
            serde_json::to_string_pretty(&Self::summary(report)).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_report;
    use serde_json::Value;

    fn render(verbosity: Verbosity, report: &RunReport) -> Value {
        let mut buffer = Vec::new();
        JsonFormatter::new(verbosity)
            .format(report, &mut buffer)
            .unwrap();
        serde_json::from_slice(&buffer).unwrap()
    }

    #[test]
    fn test_json_full_report() {
        let value = render(Verbosity::Normal, &sample_report(true));

        assert_eq!(value["outcome"]["status"], "completed");
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["summary"]["upgrades"], 1);
        assert_eq!(value["summary"]["skips"], 1);

        let action = &value["actions"][0];
        assert_eq!(action["package"], "requests");
        assert_eq!(action["current"], "2.30.0");
        assert_eq!(action["latest"], "2.31.0");

        assert_eq!(value["downloads"][0]["status"], "planned");
        assert_eq!(
            value["artifacts"][0]["uploaded_at"],
            "2023-05-22T15:12:44Z"
        );
        assert_eq!(value["skips"][0]["reason"]["kind"], "already_latest");
    }

    #[test]
    fn test_json_failed_download() {
        let value = render(Verbosity::Normal, &sample_report(false));

        assert_eq!(value["summary"]["failed_downloads"], 1);
        assert_eq!(value["downloads"][0]["status"], "failed");
        assert_eq!(value["downloads"][0]["stderr"], "no network");
    }

    #[test]
    fn test_json_quiet_is_summary_only() {
        let value = render(Verbosity::Quiet, &sample_report(true));

        assert_eq!(value["upgrades"], 1);
        assert!(value.get("actions").is_none());
    }
}
