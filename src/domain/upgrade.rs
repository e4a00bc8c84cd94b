//! Upgrade decision for a single package

use super::PackageName;
use crate::update::Pep440Version;
use serde::Serialize;
use std::fmt;

/// A decision to fetch a newer release of a package.
///
/// Actions compare by value, so the same upgrade reached through several
/// artifacts of one release collapses to a single entry in a set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct UpgradeAction {
    /// Package to upgrade
    pub package: PackageName,
    /// Greatest compliant version held locally
    pub current: Pep440Version,
    /// Latest compliant version on the index
    pub latest: Pep440Version,
}

impl UpgradeAction {
    /// Create a new upgrade action
    pub fn new(package: PackageName, current: Pep440Version, latest: Pep440Version) -> Self {
        Self {
            package,
            current,
            latest,
        }
    }

    /// Requirement pinning the target release, e.g. `requests==2.32.0`
    pub fn requirement(&self) -> String {
        format!("{}=={}", self.package, self.latest)
    }
}

impl fmt::Display for UpgradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "update {} from {} to {}",
            self.package, self.current, self.latest
        )
    }
}
