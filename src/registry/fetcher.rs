//! Parallel metadata fetcher
//!
//! Issues one metadata query per package with bounded concurrency. Each
//! package gets its own result slot, so a failed query is recorded for
//! that package and never stops the rest of the batch.

use crate::cancel::CancellationToken;
use crate::domain::PackageName;
use crate::error::RegistryError;
use crate::progress::Progress;
use crate::registry::{MetadataPayload, RegistryAdapter};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, warn};

/// Default concurrency limit for registry requests
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Per-package outcome of a metadata query
pub type FetchResults = BTreeMap<PackageName, Result<MetadataPayload, RegistryError>>;

/// Fetches release metadata for a batch of packages
pub struct MetadataFetcher {
    adapter: Arc<dyn RegistryAdapter>,
    concurrency: usize,
}

impl MetadataFetcher {
    /// Create a new fetcher
    pub fn new(adapter: Arc<dyn RegistryAdapter>, concurrency: usize) -> Self {
        Self {
            adapter,
            concurrency: concurrency.max(1),
        }
    }

    /// Query every package, collecting one result per package.
    ///
    /// Packages whose query has not started when the token is cancelled
    /// are left out of the result.
    pub async fn fetch_all(
        &self,
        packages: &[PackageName],
        cancel: &CancellationToken,
        progress: &Progress,
    ) -> FetchResults {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for package in packages.iter().cloned() {
            let adapter = Arc::clone(&self.adapter);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                if cancel.is_cancelled() {
                    return None;
                }
                let result = adapter.fetch_metadata(&package).await;
                Some((package, result))
            });
        }

        let mut results = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some((package, result))) => {
                    if let Err(e) = &result {
                        warn!("{}", e);
                    }
                    progress.set_message(&format!("Fetched {}", package));
                    results.insert(package, result);
                }
                Ok(None) => {}
                Err(e) => error!("metadata task failed: {}", e),
            }
            progress.inc();
        }

        results
    }
}
