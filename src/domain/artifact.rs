//! Downloadable artifact resolved from the package index

use super::PackageName;
use crate::update::Pep440Version;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One file published under a package's latest release.
///
/// A release with both a wheel and a source distribution yields two
/// candidates sharing the same `latest_version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactCandidate {
    /// Canonical package name taken from the index metadata
    pub package: PackageName,
    /// Artifact filename, e.g. `requests-2.32.0-py3-none-any.whl`
    pub filename: String,
    /// Download URL of the artifact
    pub url: String,
    /// The selected latest release
    pub latest_version: Pep440Version,
    /// When the file was uploaded, if the index reported it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl ArtifactCandidate {
    /// Create a new candidate
    pub fn new(
        package: PackageName,
        filename: impl Into<String>,
        url: impl Into<String>,
        latest_version: Pep440Version,
    ) -> Self {
        Self {
            package,
            filename: filename.into(),
            url: url.into(),
            latest_version,
            uploaded_at: None,
        }
    }

    /// Attach the upload time
    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = Some(uploaded_at);
        self
    }
}
