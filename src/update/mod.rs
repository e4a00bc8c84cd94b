//! Update planning logic for local packages
//!
//! This module provides:
//! - PEP 440 version ordering
//! - Package filter configuration from CLI args
//! - Latest-release selection from index metadata
//! - Update planner that decides which releases to fetch

mod filter;
mod selector;
mod version;

pub use filter::UpdateFilter;
pub use selector::{LatestReleaseSelector, Selection};
pub use version::{compliant_versions, is_compliant, max_compliant, Pep440Version, PrePhase};

use crate::domain::{ArtifactCandidate, PackageSkip, SkipReason, UpgradeAction};
use crate::inventory::LocalInventory;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Result of planning: what to fetch and what was left alone
#[derive(Debug, Default)]
pub struct UpdatePlan {
    /// Deduplicated upgrade actions
    pub actions: BTreeSet<UpgradeAction>,
    /// Artifacts not yet present locally that belong to a planned upgrade
    pub artifacts: Vec<ArtifactCandidate>,
    /// Candidates that did not lead to an upgrade
    pub skips: Vec<PackageSkip>,
}

impl UpdatePlan {
    /// Returns true if nothing needs to be fetched
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn skip(&mut self, skip: PackageSkip) {
        if !self.skips.contains(&skip) {
            self.skips.push(skip);
        }
    }
}

/// Update planner that compares the local inventory with the latest releases
#[derive(Debug, Default)]
pub struct UpdatePlanner;

impl UpdatePlanner {
    /// Create a new planner
    pub fn new() -> Self {
        Self
    }

    /// Decide which upgrades are needed.
    ///
    /// A candidate leads to an upgrade when its file is not already in the
    /// packages directory and the greatest compliant local version of the
    /// package is older than the candidate's release.
    pub fn plan(&self, inventory: &LocalInventory, candidates: &[ArtifactCandidate]) -> UpdatePlan {
        let mut plan = UpdatePlan::default();

        for candidate in candidates {
            let package = &candidate.package;

            // Exact filename match, not version match
            if inventory.contains_file(&candidate.filename) {
                debug!("{} already present", candidate.filename);
                plan.skip(PackageSkip::new(
                    package.clone(),
                    SkipReason::AlreadyPresent(candidate.filename.clone()),
                ));
                continue;
            }

            let current = inventory
                .versions(package)
                .and_then(|versions| max_compliant(versions.iter().map(String::as_str)));

            let Some(current) = current else {
                warn!(
                    "no compliant local version of {}, skipping {}",
                    package, candidate.filename
                );
                plan.skip(PackageSkip::new(
                    package.clone(),
                    SkipReason::NoCompliantLocalVersion,
                ));
                continue;
            };

            if current < candidate.latest_version {
                plan.actions.insert(UpgradeAction::new(
                    package.clone(),
                    current,
                    candidate.latest_version.clone(),
                ));
                plan.artifacts.push(candidate.clone());
            } else {
                plan.skip(PackageSkip::new(package.clone(), SkipReason::AlreadyLatest));
            }
        }

        plan
    }
}
