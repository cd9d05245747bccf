//! Command implementations

pub mod audit;
pub mod doctor;
pub mod info;
pub mod install;
pub mod list;
pub mod search;
pub mod update;

use anyhow::Result;
use portier_registry::{Registry, RegistrySource};
use std::path::Path;

/// Load the registry, honoring an explicit `--registry` override
pub fn load_registry(override_path: Option<&Path>, remote_url: Option<String>) -> Result<Registry> {
    let registry = match override_path {
        Some(path) => RegistrySource::load_file(path)?,
        None => RegistrySource::new(remote_url).load()?,
    };
    Ok(registry)
}
