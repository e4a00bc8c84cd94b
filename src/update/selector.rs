//! Latest-release selection
//!
//! Decodes a package's JSON metadata, picks the greatest PEP 440 compliant
//! release and turns every file of that release into an artifact
//! candidate. Problems with one package's metadata only affect that
//! package.

use crate::domain::{ArtifactCandidate, PackageName, PackageSkip, SkipReason};
use crate::error::MetadataError;
use crate::registry::{FetchResults, MetadataPayload};
use crate::update::Pep440Version;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

/// Project metadata response of the JSON API
#[derive(Debug, Deserialize)]
struct ProjectMetadata {
    info: ProjectInfo,
    /// Files keyed by release version string
    releases: BTreeMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    name: String,
}

/// Release file information
#[derive(Debug, Deserialize)]
struct ReleaseFile {
    filename: String,
    url: String,
    #[serde(default)]
    upload_time_iso_8601: Option<String>,
}

/// Candidates and skips gathered from a batch of metadata results
#[derive(Debug, Default)]
pub struct Selection {
    /// Files of each package's latest release
    pub candidates: Vec<ArtifactCandidate>,
    /// Packages that yielded no candidates
    pub skips: Vec<PackageSkip>,
}

/// Selects the latest release of a package from its metadata
#[derive(Debug, Default)]
pub struct LatestReleaseSelector;

impl LatestReleaseSelector {
    /// Create a new selector
    pub fn new() -> Self {
        Self
    }

    /// Resolve one package's latest release to its artifacts
    pub fn select(
        &self,
        payload: &MetadataPayload,
    ) -> Result<Vec<ArtifactCandidate>, MetadataError> {
        let metadata: ProjectMetadata = serde_json::from_str(&payload.body).map_err(|e| {
            MetadataError::malformed(payload.package.as_str(), e.to_string(), &payload.body)
        })?;

        let (latest, files) = metadata
            .releases
            .iter()
            .filter_map(|(version, files)| match Pep440Version::parse(version) {
                Some(parsed) => Some((parsed, files)),
                None => {
                    debug!(
                        "ignoring non-compliant release '{}' of {}",
                        version, payload.package
                    );
                    None
                }
            })
            .max_by(|a, b| a.0.cmp(&b.0))
            .ok_or_else(|| MetadataError::no_compliant_version(payload.package.as_str()))?;

        let package = PackageName::new(&metadata.info.name);
        debug!(
            "latest release of {} is {} ({} files)",
            package,
            latest,
            files.len()
        );

        let candidates = files
            .iter()
            .map(|file| {
                let candidate =
                    ArtifactCandidate::new(package.clone(), &file.filename, &file.url, latest.clone());
                match file
                    .upload_time_iso_8601
                    .as_deref()
                    .and_then(|time| time.parse::<DateTime<Utc>>().ok())
                {
                    Some(uploaded_at) => candidate.with_uploaded_at(uploaded_at),
                    None => candidate,
                }
            })
            .collect();

        Ok(candidates)
    }

    /// Select candidates for every fetched package.
    ///
    /// Failed fetches, malformed payloads and packages without a compliant
    /// release become skips; the rest of the batch is unaffected.
    pub fn select_all(&self, results: &FetchResults) -> Selection {
        let mut selection = Selection::default();

        for (package, result) in results {
            let payload = match result {
                Ok(payload) => payload,
                Err(e) => {
                    selection.skips.push(PackageSkip::new(
                        package.clone(),
                        SkipReason::FetchFailed(e.to_string()),
                    ));
                    continue;
                }
            };

            match self.select(payload) {
                Ok(candidates) => selection.candidates.extend(candidates),
                Err(MetadataError::Malformed { message, raw, .. }) => {
                    error!("malformed metadata for {}: {} - {}", package, message, raw);
                    selection.skips.push(PackageSkip::new(
                        package.clone(),
                        SkipReason::MalformedMetadata(message),
                    ));
                }
                Err(e @ MetadataError::NoCompliantVersion { .. }) => {
                    warn!("{}", e);
                    selection.skips.push(PackageSkip::new(
                        package.clone(),
                        SkipReason::NoCompliantRemoteVersion,
                    ));
                }
            }
        }

        selection
    }
}
