//! Core domain models for pypi-refresh
//!
//! This module contains the fundamental types used throughout the application:
//! - Normalized package names
//! - Downloadable artifact candidates resolved from the index
//! - Upgrade actions decided by the planner
//! - Skip records explaining why a package was left alone

mod artifact;
mod package_name;
mod skip;
mod upgrade;

pub use artifact::ArtifactCandidate;
pub use package_name::PackageName;
pub use skip::{PackageSkip, SkipReason};
pub use upgrade::UpgradeAction;
