//! Reasons a package or artifact was left alone

use super::PackageName;
use serde::Serialize;
use std::fmt;

/// Reason why a package update was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Package was excluded via --exclude
    Excluded,
    /// Package not in --only list
    NotInOnlyList,
    /// Failed to fetch metadata from the index
    FetchFailed(String),
    /// The metadata payload could not be read
    MalformedMetadata(String),
    /// The index lists no PEP 440 compliant release
    NoCompliantRemoteVersion,
    /// No compliant local version to compare against
    NoCompliantLocalVersion,
    /// The artifact file is already in the packages directory
    AlreadyPresent(String),
    /// Local version is already at or above the latest release
    AlreadyLatest,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Excluded => write!(f, "excluded by --exclude"),
            SkipReason::NotInOnlyList => write!(f, "not in --only list"),
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
            SkipReason::MalformedMetadata(msg) => write!(f, "malformed metadata: {}", msg),
            SkipReason::NoCompliantRemoteVersion => write!(f, "no compliant release on index"),
            SkipReason::NoCompliantLocalVersion => write!(f, "no compliant local version"),
            SkipReason::AlreadyPresent(filename) => write!(f, "{} already present", filename),
            SkipReason::AlreadyLatest => write!(f, "already at latest"),
        }
    }
}

/// A skipped package together with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSkip {
    /// The package that was skipped
    pub package: PackageName,
    /// The reason for skipping
    pub reason: SkipReason,
}

impl PackageSkip {
    /// Creates a skip record
    pub fn new(package: PackageName, reason: SkipReason) -> Self {
        Self { package, reason }
    }
}

impl fmt::Display for PackageSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.package, self.reason)
    }
}
