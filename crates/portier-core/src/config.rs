//! User configuration loading
//!
//! Portier reads a single optional YAML file at `~/.portier/config.yaml`.
//! Every field has a default so a missing file yields a fully working
//! configuration. Environment variables override the file for the two
//! deployment-sensitive endpoints.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default minimum trust score a package must meet
pub const DEFAULT_MIN_TRUST: f64 = 0.5;

/// Default wall-clock bound for an installer subprocess (seconds)
pub const DEFAULT_INSTALL_TIMEOUT_SECS: u64 = 600;

/// Environment variable overriding the intent endpoint
pub const ENV_INTENT_ENDPOINT: &str = "PORTIER_INTENT_ENDPOINT";

/// Environment variable overriding the remote registry URL
pub const ENV_REGISTRY_URL: &str = "PORTIER_REGISTRY_URL";

/// Portier gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortierConfig {
    /// Minimum trust score required by the policy evaluator
    pub min_trust: f64,

    /// Intent-analysis endpoint; None disables the check entirely
    pub intent_endpoint: Option<String>,

    /// Deny installation when the intent check comes back flagged
    pub deny_on_flagged: bool,

    /// Remote registry index URL used by `portier update`
    pub registry_url: Option<String>,

    /// Wall-clock bound for installer subprocesses (seconds)
    pub install_timeout_secs: u64,
}

impl Default for PortierConfig {
    fn default() -> Self {
        Self {
            min_trust: DEFAULT_MIN_TRUST,
            intent_endpoint: None,
            deny_on_flagged: false,
            registry_url: None,
            install_timeout_secs: DEFAULT_INSTALL_TIMEOUT_SECS,
        }
    }
}

impl PortierConfig {
    /// Load configuration from the default location, applying environment
    /// overrides. A missing file is not an error.
    pub fn load_default() -> Result<Self> {
        let path = crate::portier_dir().join("config.yaml");
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            debug!("No config file at {:?}, using defaults", path);
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply environment-variable overrides on top of file/default values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(ENV_INTENT_ENDPOINT) {
            if !endpoint.is_empty() {
                self.intent_endpoint = Some(endpoint);
            }
        }
        if let Ok(url) = std::env::var(ENV_REGISTRY_URL) {
            if !url.is_empty() {
                self.registry_url = Some(url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PortierConfig::default();
        assert_eq!(config.min_trust, DEFAULT_MIN_TRUST);
        assert!(config.intent_endpoint.is_none());
        assert!(!config.deny_on_flagged);
        assert_eq!(config.install_timeout_secs, DEFAULT_INSTALL_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "min_trust: 0.8\nintent_endpoint: http://localhost:11434/api/check\ndeny_on_flagged: true\n",
        )
        .unwrap();

        let config = PortierConfig::load_from(&path).unwrap();
        assert_eq!(config.min_trust, 0.8);
        assert_eq!(
            config.intent_endpoint.as_deref(),
            Some("http://localhost:11434/api/check")
        );
        assert!(config.deny_on_flagged);
        // Unset fields keep their defaults
        assert_eq!(config.install_timeout_secs, DEFAULT_INSTALL_TIMEOUT_SECS);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "min_trust: 0.6\n").unwrap();

        let config = PortierConfig::load_from(&path).unwrap();
        assert_eq!(config.min_trust, 0.6);
        assert!(config.registry_url.is_none());
    }
}
