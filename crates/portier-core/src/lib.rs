//! # portier-core
//!
//! Core library for the Portier package-installation gateway providing:
//! - Type definitions for package records, policy decisions, install
//!   results, and audit records
//! - The shared error type used across workspace crates
//! - User configuration loading (~/.portier/config.yaml)

pub mod config;
pub mod error;
pub mod types;

pub use config::PortierConfig;
pub use error::{Error, Result};
pub use types::{
    AuditRecord, InstallResult, IntentCheck, IntentStatus, Outcome, PackageRecord, PolicyDecision,
};

use std::path::PathBuf;

/// Directory holding Portier state (registry cache, audit trail, config).
///
/// Defaults to `~/.portier`; falls back to the current directory when no
/// home directory can be resolved (containers, stripped-down CI images).
pub fn portier_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".portier"))
        .unwrap_or_else(|| PathBuf::from(".portier"))
}
