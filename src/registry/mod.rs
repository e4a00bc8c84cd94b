//! Registry adapters for fetching package release metadata
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - PyPI JSON API adapter
//! - Parallel metadata fetcher isolating per-package failures

mod client;
mod fetcher;
mod pypi;

pub use client::{HttpClient, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use fetcher::{FetchResults, MetadataFetcher, DEFAULT_CONCURRENCY};
pub use pypi::{PyPIAdapter, PYPI_API_URL};

use crate::domain::PackageName;
use crate::error::RegistryError;
use async_trait::async_trait;

/// Raw release metadata for one package, not yet decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPayload {
    /// The package name the query was issued for
    pub package: PackageName,
    /// Response body as returned by the index
    pub body: String,
}

impl MetadataPayload {
    /// Create a new payload
    pub fn new(package: PackageName, body: impl Into<String>) -> Self {
        Self {
            package,
            body: body.into(),
        }
    }
}

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch the release metadata of a package
    async fn fetch_metadata(&self, package: &PackageName) -> Result<MetadataPayload, RegistryError>;
}
