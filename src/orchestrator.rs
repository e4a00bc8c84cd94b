//! Refresh orchestrator for coordinating the entire workflow
//!
//! This module provides:
//! - Workflow coordination: scan → fetch → select → plan → download
//! - Parallel metadata queries with a concurrency limit
//! - Dry-run mode support
//! - Package filter application
//! - Cancellation checkpoints between stages

use crate::cancel::{CancellationToken, INTERRUPTED_EXIT_CODE};
use crate::config::Settings;
use crate::domain::{ArtifactCandidate, PackageName, PackageSkip, UpgradeAction};
use crate::downloader::{DownloadResult, DownloadRunner, FetchExecutor, PipDownloader};
use crate::error::AppError;
use crate::inventory::LocalInventory;
use crate::progress::Progress;
use crate::registry::{HttpClient, MetadataFetcher, PyPIAdapter, RegistryAdapter, DEFAULT_USER_AGENT};
use crate::update::{LatestReleaseSelector, UpdatePlanner};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pipeline stage gated by a cancellation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    MetadataFetch,
    Selection,
    Execution,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::MetadataFetch => write!(f, "metadata fetch"),
            Stage::Selection => write!(f, "release selection"),
            Stage::Execution => write!(f, "download"),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every stage ran; per-package failures may still have occurred
    Completed,
    /// Cancellation was observed before or during the named stage
    Interrupted { stage: Stage },
}

impl RunOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Completed => 0,
            RunOutcome::Interrupted { .. } => INTERRUPTED_EXIT_CODE,
        }
    }

    /// Returns true if the run was cut short
    pub fn is_interrupted(&self) -> bool {
        matches!(self, RunOutcome::Interrupted { .. })
    }
}

/// Everything a run did or decided
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// How the run ended
    pub outcome: RunOutcome,
    /// True if downloads were only logged
    pub dry_run: bool,
    /// Scanned packages directory
    pub packages_dir: PathBuf,
    /// Number of distinct packages found locally
    pub local_packages: usize,
    /// Number of archive files found locally
    pub local_files: usize,
    /// Number of packages queried on the index
    pub queried: usize,
    /// Planned upgrades
    pub actions: Vec<UpgradeAction>,
    /// Artifacts of the planned upgrades
    pub artifacts: Vec<ArtifactCandidate>,
    /// Download outcomes
    pub downloads: Vec<DownloadResult>,
    /// Packages left alone and why
    pub skips: Vec<PackageSkip>,
}

impl RunReport {
    fn new(settings: &Settings, inventory: &LocalInventory) -> Self {
        Self {
            outcome: RunOutcome::Completed,
            dry_run: !settings.execute,
            packages_dir: inventory.dir().to_path_buf(),
            local_packages: inventory.package_count(),
            local_files: inventory.file_count(),
            queried: 0,
            actions: Vec::new(),
            artifacts: Vec::new(),
            downloads: Vec::new(),
            skips: Vec::new(),
        }
    }

    fn interrupted(mut self, stage: Stage) -> Self {
        warn!("interrupted before {} finished", stage);
        self.outcome = RunOutcome::Interrupted { stage };
        self
    }

    /// Number of failed downloads
    pub fn failed_downloads(&self) -> usize {
        self.downloads.iter().filter(|d| !d.is_ok()).count()
    }
}

/// Orchestrator for coordinating the refresh workflow
pub struct Orchestrator {
    /// Resolved settings
    settings: Settings,
    /// Metadata source
    adapter: Arc<dyn RegistryAdapter>,
    /// Download collaborator
    runner: Box<dyn DownloadRunner>,
    /// Cooperative cancellation signal
    cancel: CancellationToken,
}

impl Orchestrator {
    /// Create a new orchestrator talking to the configured index through pip
    pub fn new(settings: Settings, cancel: CancellationToken) -> Result<Self, AppError> {
        let client = HttpClient::with_config(settings.timeout, DEFAULT_USER_AGENT)?;
        let adapter = Arc::new(PyPIAdapter::with_base_url(client, &settings.index_url));
        let runner = Box::new(PipDownloader::new(
            &settings.pip,
            &settings.simple_url,
            &settings.packages_dir,
            settings.execute,
        ));
        Ok(Self::with_parts(settings, adapter, runner, cancel))
    }

    /// Create an orchestrator with custom collaborators (for testing)
    pub fn with_parts(
        settings: Settings,
        adapter: Arc<dyn RegistryAdapter>,
        runner: Box<dyn DownloadRunner>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            settings,
            adapter,
            runner,
            cancel,
        }
    }

    /// Run the refresh workflow.
    ///
    /// Only an unreadable packages directory is an error; every other
    /// problem is recorded per package in the report.
    pub async fn run(&self) -> Result<RunReport, AppError> {
        // Step 1: Scan the local packages directory
        let inventory = LocalInventory::scan(&self.settings.packages_dir)?;
        info!(
            "found {} packages ({} files) in {}",
            inventory.package_count(),
            inventory.file_count(),
            inventory.dir().display()
        );
        let mut report = RunReport::new(&self.settings, &inventory);

        let packages = self.filter_packages(&inventory, &mut report);
        report.queried = packages.len();

        // Step 2: Fetch release metadata
        if self.cancel.is_cancelled() {
            return Ok(report.interrupted(Stage::MetadataFetch));
        }
        let mut progress = Progress::new(self.settings.show_progress());
        progress.start(packages.len() as u64, "Fetching metadata");
        let fetcher = MetadataFetcher::new(Arc::clone(&self.adapter), self.settings.concurrency);
        let results = fetcher.fetch_all(&packages, &self.cancel, &progress).await;
        progress.finish_and_clear();

        // Step 3: Select latest releases and plan upgrades
        if self.cancel.is_cancelled() {
            return Ok(report.interrupted(Stage::Selection));
        }
        let selection = LatestReleaseSelector::new().select_all(&results);
        report.skips.extend(selection.skips);

        let plan = UpdatePlanner::new().plan(&inventory, &selection.candidates);
        debug!(
            "{} candidates, {} upgrades planned",
            selection.candidates.len(),
            plan.actions.len()
        );
        report.skips.extend(plan.skips);
        report.artifacts = plan.artifacts;

        // Step 4: Download
        if self.cancel.is_cancelled() {
            report.actions = plan.actions.into_iter().collect();
            return Ok(report.interrupted(Stage::Execution));
        }
        let execution = FetchExecutor::new(self.runner.as_ref()).execute(&plan.actions, &self.cancel);
        report.actions = plan.actions.into_iter().collect();
        report.downloads = execution.results;

        if execution.interrupted {
            return Ok(report.interrupted(Stage::Execution));
        }
        Ok(report)
    }

    /// Apply the package filters, recording filtered packages as skips
    fn filter_packages(&self, inventory: &LocalInventory, report: &mut RunReport) -> Vec<PackageName> {
        let mut packages = Vec::new();
        for package in inventory.package_names() {
            match self.settings.filter.check(package) {
                Some(reason) => {
                    debug!("skipping {}: {}", package, reason);
                    report.skips.push(PackageSkip::new(package.clone(), reason));
                }
                None => packages.push(package.clone()),
            }
        }
        packages
    }
}
