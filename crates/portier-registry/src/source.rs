//! Registry sourcing
//!
//! The registry index is a JSON document with an ordered `packages` array.
//! Load preference: local cache file (~/.portier/packages.json), then the
//! bundled default index. `update` fetches the remote index and rewrites
//! the cache; the running process picks up the new data by reloading into
//! a fresh [`Registry`](crate::Registry).

use crate::Registry;
use portier_core::{Error, PackageRecord, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bundled default index, used when no cache file exists yet
const BUNDLED_INDEX: &str = include_str!("../assets/packages.json");

/// Timeout for fetching the remote index
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// On-disk/remote index document
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexFile {
    pub packages: Vec<PackageRecord>,
}

/// Locates, loads, and refreshes the registry index
pub struct RegistrySource {
    cache_path: PathBuf,
    remote_url: Option<String>,
}

impl RegistrySource {
    /// Source rooted at the default cache location
    pub fn new(remote_url: Option<String>) -> Self {
        Self {
            cache_path: portier_core::portier_dir().join("packages.json"),
            remote_url,
        }
    }

    /// Source with a custom cache path (used by tests)
    pub fn with_cache_path(cache_path: PathBuf, remote_url: Option<String>) -> Self {
        Self {
            cache_path,
            remote_url,
        }
    }

    /// Path of the local cache file
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Load the registry: cache file if present, bundled default otherwise
    pub fn load(&self) -> Result<Registry> {
        if self.cache_path.exists() {
            debug!("Loading registry from cache: {:?}", self.cache_path);
            let content = std::fs::read_to_string(&self.cache_path)?;
            match Self::parse(&content) {
                Ok(registry) => return Ok(registry),
                Err(e) => {
                    // A corrupt cache must not brick the gateway
                    warn!("Ignoring unreadable registry cache: {}", e);
                }
            }
        }
        debug!("Loading bundled registry index");
        Self::parse(BUNDLED_INDEX)
    }

    /// Load the registry from an explicit index file
    pub fn load_file(path: &Path) -> Result<Registry> {
        if !path.exists() {
            return Err(Error::registry_not_found(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Fetch the remote index, rewrite the cache, and return the number of
    /// packages in the refreshed registry.
    ///
    /// The downloaded document is validated before the cache is touched so
    /// a bad remote index can never clobber a working cache.
    pub async fn update(&self) -> Result<usize> {
        let url = self
            .remote_url
            .as_deref()
            .ok_or_else(|| Error::invalid_config("no registry_url configured"))?;

        debug!("Fetching registry index from {}", url);
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| Error::invalid_config(format!("http client: {}", e)))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::invalid_config(format!("registry fetch failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(Error::invalid_config(format!(
                "registry fetch failed: HTTP {}",
                response.status()
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| Error::invalid_config(format!("registry fetch failed: {}", e)))?;

        let registry = Self::parse(&body)?;

        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.cache_path, &body)?;
        info!(
            "Registry cache updated: {} packages from {}",
            registry.len(),
            url
        );
        Ok(registry.len())
    }

    fn parse(content: &str) -> Result<Registry> {
        let index: IndexFile = serde_json::from_str(content)?;
        Registry::from_records(index.packages)
    }
}
