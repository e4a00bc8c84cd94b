//! PyPI JSON API adapter
//!
//! Fetches per-package release metadata from PyPI.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::domain::PackageName;
use crate::error::RegistryError;
use crate::registry::{HttpClient, MetadataPayload, RegistryAdapter};
use async_trait::async_trait;

/// PyPI API base URL
pub const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter for the public index
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_API_URL)
    }

    /// Create a new adapter for another index exposing the same JSON API
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &PackageName) -> String {
        format!("{}/{}/json", self.base_url, package)
    }
}

#[async_trait]
impl RegistryAdapter for PyPIAdapter {
    fn registry_name(&self) -> &'static str {
        "PyPI"
    }

    async fn fetch_metadata(&self, package: &PackageName) -> Result<MetadataPayload, RegistryError> {
        let url = self.build_url(package);
        let body = self
            .client
            .get_text(&url, package.as_str(), self.registry_name())
            .await?;

        Ok(MetadataPayload::new(package.clone(), body))
    }
}
