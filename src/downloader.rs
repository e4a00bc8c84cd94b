//! Download execution for planned upgrades
//!
//! This module provides:
//! - The download collaborator trait and its pip-backed implementation
//! - A sequential executor that stops at the first observed cancellation

use crate::cancel::CancellationToken;
use crate::domain::{PackageName, UpgradeAction};
use crate::update::Pep440Version;
use serde::Serialize;
use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::{debug, error, info};

/// Outcome of one download invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    /// Dry run: the command was logged, not executed
    Planned,
    /// The command ran and exited successfully
    Succeeded,
    /// The command could not be started or exited with an error
    Failed,
}

/// Result of a download invocation
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResult {
    /// Package being downloaded
    pub package: PackageName,
    /// Exact version requested
    pub version: Pep440Version,
    /// The command line that was (or would be) executed
    pub command: String,
    /// Outcome
    pub status: DownloadStatus,
    /// Standard output from the command
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    /// Standard error from the command
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl DownloadResult {
    fn new(action: &UpgradeAction, command: String, status: DownloadStatus) -> Self {
        Self {
            package: action.package.clone(),
            version: action.latest.clone(),
            command,
            status,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Create a planned (dry run) result
    pub fn planned(action: &UpgradeAction, command: String) -> Self {
        Self::new(action, command, DownloadStatus::Planned)
    }

    /// Create a successful result
    pub fn success(action: &UpgradeAction, command: String, stdout: String, stderr: String) -> Self {
        Self {
            stdout,
            stderr,
            ..Self::new(action, command, DownloadStatus::Succeeded)
        }
    }

    /// Create a failed result
    pub fn failure(action: &UpgradeAction, command: String, stdout: String, stderr: String) -> Self {
        Self {
            stdout,
            stderr,
            ..Self::new(action, command, DownloadStatus::Failed)
        }
    }

    /// Returns true if the download did not fail
    pub fn is_ok(&self) -> bool {
        self.status != DownloadStatus::Failed
    }
}

/// Trait for the external download collaborator
pub trait DownloadRunner: Send + Sync {
    /// The command line used for an action, for logging and reports
    fn command_line(&self, action: &UpgradeAction) -> String;

    /// Place the artifacts of `action.latest` into the destination directory
    fn download(&self, action: &UpgradeAction) -> DownloadResult;
}

/// Download collaborator that shells out to `pip download`
#[derive(Debug, Clone)]
pub struct PipDownloader {
    /// pip program to invoke
    pip: String,
    /// Simple-index base URL passed with `-i`
    simple_url: String,
    /// Destination directory passed with `-d`
    dest: PathBuf,
    /// When false, commands are only logged
    execute: bool,
}

impl PipDownloader {
    /// Create a new pip downloader
    pub fn new(
        pip: impl Into<String>,
        simple_url: impl Into<String>,
        dest: impl Into<PathBuf>,
        execute: bool,
    ) -> Self {
        Self {
            pip: pip.into(),
            simple_url: simple_url.into(),
            dest: dest.into(),
            execute,
        }
    }

    /// Arguments passed to pip for an action
    fn args(&self, action: &UpgradeAction) -> Vec<String> {
        vec![
            "-q".to_string(),
            "download".to_string(),
            "--no-deps".to_string(),
            "-i".to_string(),
            self.simple_url.clone(),
            "-d".to_string(),
            self.dest.display().to_string(),
            action.requirement(),
        ]
    }

    fn run_command(&self, args: &[String]) -> std::io::Result<Output> {
        Command::new(&self.pip).args(args).output()
    }
}

impl DownloadRunner for PipDownloader {
    fn command_line(&self, action: &UpgradeAction) -> String {
        let mut parts = vec![self.pip.clone()];
        parts.extend(self.args(action));
        parts.join(" ")
    }

    fn download(&self, action: &UpgradeAction) -> DownloadResult {
        let command = self.command_line(action);
        if !self.execute {
            return DownloadResult::planned(action, command);
        }

        match self.run_command(&self.args(action)) {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                if output.status.success() {
                    DownloadResult::success(action, command, stdout, stderr)
                } else {
                    DownloadResult::failure(action, command, stdout, stderr)
                }
            }
            Err(e) => DownloadResult::failure(
                action,
                command,
                String::new(),
                format!("Failed to execute command: {}", e),
            ),
        }
    }
}

/// Downloads produced by a fetch execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    /// One result per attempted action
    pub results: Vec<DownloadResult>,
    /// True if cancellation stopped the batch early
    pub interrupted: bool,
}

impl ExecutionReport {
    /// Number of failed downloads
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_ok()).count()
    }
}

/// Runs a download for every planned action
pub struct FetchExecutor<'a> {
    runner: &'a dyn DownloadRunner,
}

impl<'a> FetchExecutor<'a> {
    /// Create a new executor around a download collaborator
    pub fn new(runner: &'a dyn DownloadRunner) -> Self {
        Self { runner }
    }

    /// Download each action in turn.
    ///
    /// The token is checked before every download; once it is set no
    /// further downloads are started. A failed download is logged and the
    /// batch moves on.
    pub fn execute<'b, I>(&self, actions: I, cancel: &CancellationToken) -> ExecutionReport
    where
        I: IntoIterator<Item = &'b UpgradeAction>,
    {
        let mut report = ExecutionReport::default();

        for action in actions {
            if cancel.is_cancelled() {
                report.interrupted = true;
                break;
            }

            info!("# {}", action);
            info!("{}", self.runner.command_line(action));

            let result = self.runner.download(action);
            match result.status {
                DownloadStatus::Failed => error!(
                    "download of {} failed: {}",
                    action.requirement(),
                    result.stderr.trim()
                ),
                DownloadStatus::Succeeded => {
                    debug!("downloaded {}", action.requirement());
                    if !result.stdout.trim().is_empty() {
                        debug!("{}", result.stdout.trim());
                    }
                }
                DownloadStatus::Planned => {}
            }
            report.results.push(result);
        }

        report
    }
}
