//! Package filter configuration
//!
//! This module provides the UpdateFilter struct that restricts which local
//! packages are checked against the index.

use crate::domain::{PackageName, SkipReason};

/// Filter configuration for package selection
#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    /// Packages to exclude from updates
    pub exclude: Vec<PackageName>,
    /// If non-empty, only update these packages
    pub only: Vec<PackageName>,
}

impl UpdateFilter {
    /// Create a new UpdateFilter with default settings (process all)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set packages to exclude
    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude = exclude.into_iter().map(PackageName::new).collect();
        self
    }

    /// Set packages to include (only list)
    pub fn with_only<I, S>(mut self, only: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.only = only.into_iter().map(PackageName::new).collect();
        self
    }

    /// Check if a package should be processed; returns the skip reason if not
    pub fn check(&self, package: &PackageName) -> Option<SkipReason> {
        // If --only is specified, only process those packages
        if !self.only.is_empty() {
            if self.only.contains(package) {
                return None;
            }
            return Some(SkipReason::NotInOnlyList);
        }
        if self.exclude.contains(package) {
            return Some(SkipReason::Excluded);
        }
        None
    }
}
