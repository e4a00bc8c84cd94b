//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Upgrade display with colors and release dates
//! - Download outcome per upgrade
//! - Skipped package display with reasons (verbose)
//! - Summary with detailed breakdown

use crate::domain::{PackageSkip, UpgradeAction};
use crate::downloader::{DownloadResult, DownloadStatus};
use crate::orchestrator::{RunOutcome, RunReport};
use crate::output::{OutputFormatter, Verbosity};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self, report: &RunReport) -> String {
        if report.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    /// Format a download status for display
    fn status_label(&self, download: Option<&DownloadResult>) -> String {
        let (plain, status) = match download.map(|d| d.status) {
            Some(DownloadStatus::Planned) => ("planned", Some(DownloadStatus::Planned)),
            Some(DownloadStatus::Succeeded) => ("downloaded", Some(DownloadStatus::Succeeded)),
            Some(DownloadStatus::Failed) => ("failed", Some(DownloadStatus::Failed)),
            None => ("not started", None),
        };
        if !self.color {
            return plain.to_string();
        }
        match status {
            Some(DownloadStatus::Planned) => plain.cyan().to_string(),
            Some(DownloadStatus::Succeeded) => plain.green().to_string(),
            Some(DownloadStatus::Failed) => plain.red().bold().to_string(),
            None => plain.dimmed().to_string(),
        }
    }

    /// Latest upload time among the artifacts of each upgraded package
    fn release_dates(report: &RunReport) -> BTreeMap<&str, DateTime<Utc>> {
        let mut dates: BTreeMap<&str, DateTime<Utc>> = BTreeMap::new();
        for artifact in &report.artifacts {
            if let Some(uploaded_at) = artifact.uploaded_at {
                let entry = dates.entry(artifact.package.as_str()).or_insert(uploaded_at);
                if uploaded_at > *entry {
                    *entry = uploaded_at;
                }
            }
        }
        dates
    }

    /// Format a single upgrade line
    fn format_upgrade_line(
        &self,
        action: &UpgradeAction,
        download: Option<&DownloadResult>,
        released_at: Option<DateTime<Utc>>,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let name = action.package.as_str();
        let current = action.current.as_str();
        let latest = action.latest.as_str();
        let status = self.status_label(download);
        let date_display = released_at
            .map(|d| format!(" ({})", d.format("%Y/%m/%d %H:%M")))
            .unwrap_or_default();
        let pre_tag = if action.latest.is_prerelease() {
            " pre-release"
        } else {
            ""
        };

        if self.color {
            let name_display = format!("{:width$}", name, width = max_name_len);
            writeln!(
                writer,
                "  {} {} {} {} [{}]{}{}",
                name_display,
                current.dimmed(),
                "→".dimmed(),
                latest.bright_white().bold(),
                status,
                pre_tag.yellow(),
                date_display.dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]{}{}",
                name,
                current,
                latest,
                status,
                pre_tag,
                date_display,
                width = max_name_len
            )
        }
    }

    /// Format a single skip line
    fn format_skip_line(
        &self,
        skip: &PackageSkip,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let name = skip.package.as_str();
        if self.color {
            let name_display = format!("{:width$}", name, width = max_name_len);
            writeln!(
                writer,
                "  {} {}",
                name_display.dimmed(),
                format!("({})", skip.reason).dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {:width$} ({})",
                name,
                skip.reason,
                width = max_name_len
            )
        }
    }

    /// Format the failed downloads with their error output
    fn format_failures(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let failures: Vec<&DownloadResult> =
            report.downloads.iter().filter(|d| !d.is_ok()).collect();
        if failures.is_empty() {
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}:", "Errors".red().bold())?;
        } else {
            writeln!(writer, "Errors:")?;
        }
        for failure in failures {
            let message = format!("{}=={}: {}", failure.package, failure.version, failure.stderr.trim());
            if self.color {
                writeln!(writer, "  {} {}", "✗".red(), message)?;
            } else {
                writeln!(writer, "  - {}", message)?;
            }
        }
        writeln!(writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(report, writer);
        }

        let prefix = self.dry_run_prefix(report);
        let path_display = report.packages_dir.display().to_string();
        if self.color {
            writeln!(
                writer,
                "{}{} {}",
                prefix,
                path_display.bold(),
                format!(
                    "({} packages, {} files)",
                    report.local_packages, report.local_files
                )
                .dimmed()
            )?;
        } else {
            writeln!(
                writer,
                "{}{} ({} packages, {} files)",
                prefix, path_display, report.local_packages, report.local_files
            )?;
        }

        let max_name_len = report
            .actions
            .iter()
            .map(|a| a.package.as_str().len())
            .max()
            .unwrap_or(0)
            .max(20);
        let dates = Self::release_dates(report);
        for action in &report.actions {
            let download = report
                .downloads
                .iter()
                .find(|d| d.package == action.package && d.version == action.latest);
            let released_at = dates.get(action.package.as_str()).copied();
            self.format_upgrade_line(action, download, released_at, max_name_len, writer)?;
        }

        // Write skips in verbose mode
        if self.verbosity == Verbosity::Verbose && !report.skips.is_empty() {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "  {}", "Skipped:".dimmed())?;
            } else {
                writeln!(writer, "  Skipped:")?;
            }
            let skip_max_len = report
                .skips
                .iter()
                .map(|s| s.package.as_str().len())
                .max()
                .unwrap_or(0)
                .max(20);
            for skip in &report.skips {
                self.format_skip_line(skip, skip_max_len, writer)?;
            }
        }
        writeln!(writer)?;

        self.format_failures(report, writer)?;
        self.format_summary(report, writer)
    }

    fn format_summary(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix(report);
        let upgrades = report.actions.len();
        let failed = report.failed_downloads();

        if self.verbosity == Verbosity::Quiet {
            if upgrades > 0 {
                if self.color {
                    writeln!(writer, "{}{} upgrades", prefix, upgrades.to_string().green())?;
                } else {
                    writeln!(writer, "{}{} upgrades", prefix, upgrades)?;
                }
            } else if self.color {
                writeln!(writer, "{}{}", prefix, "No upgrades".dimmed())?;
            } else {
                writeln!(writer, "{}No upgrades", prefix)?;
            }
        } else if self.color {
            writeln!(writer, "{}{}:", prefix, "Summary".bold())?;
            if upgrades > 0 {
                writeln!(
                    writer,
                    "  {} package(s) to upgrade, {} failed",
                    upgrades.to_string().green(),
                    if failed > 0 {
                        failed.to_string().red().to_string()
                    } else {
                        failed.to_string().dimmed().to_string()
                    }
                )?;
            } else {
                writeln!(writer, "  {}", "Everything is up to date".dimmed())?;
            }
            if !report.skips.is_empty() {
                writeln!(
                    writer,
                    "  {} package(s) skipped",
                    report.skips.len().to_string().dimmed()
                )?;
            }
        } else {
            writeln!(writer, "{}Summary:", prefix)?;
            if upgrades > 0 {
                writeln!(
                    writer,
                    "  {} package(s) to upgrade, {} failed",
                    upgrades, failed
                )?;
            } else {
                writeln!(writer, "  Everything is up to date")?;
            }
            if !report.skips.is_empty() {
                writeln!(writer, "  {} package(s) skipped", report.skips.len())?;
            }
        }

        if let RunOutcome::Interrupted { stage } = report.outcome {
            let message = format!("Interrupted during {}", stage);
            if self.color {
                writeln!(writer, "{}", message.yellow().bold())?;
            } else {
                writeln!(writer, "{}", message)?;
            }
        }
        Ok(())
    }
}
