//! Error types for portier-core

use thiserror::Error;

/// Result type alias using portier-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Portier
#[derive(Error, Debug)]
pub enum Error {
    /// Package not present in the registry
    #[error("Package not found: {name}")]
    PackageNotFound { name: String },

    /// Registry file could not be located
    #[error("Registry file not found: {path}")]
    RegistryNotFound { path: String },

    /// Registry entry failed validation on load
    #[error("Invalid registry record '{name}': {message}")]
    InvalidRecord { name: String, message: String },

    /// Two registry entries normalize to the same lookup key
    #[error("Duplicate package name in registry: {name}")]
    DuplicateName { name: String },

    /// Invalid configuration format
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a package not found error
    pub fn package_not_found(name: impl Into<String>) -> Self {
        Self::PackageNotFound { name: name.into() }
    }

    /// Create a registry not found error
    pub fn registry_not_found(path: impl Into<String>) -> Self {
        Self::RegistryNotFound { path: path.into() }
    }

    /// Create an invalid record error
    pub fn invalid_record(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate name error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
