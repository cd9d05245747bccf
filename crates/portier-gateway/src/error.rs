//! Pipeline error taxonomy
//!
//! Each terminal failure carries a distinct process exit code so scripts
//! can branch on the outcome of `portier install`.

use thiserror::Error;

/// Terminal failures of one pipeline invocation
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No such package in the registry
    #[error("Package '{name}' not found in registry")]
    NotFound { name: String },

    /// Static policy verdict was false; no install attempted
    #[error("Package '{package}' denied by policy")]
    PolicyDenied { package: String, reasons: Vec<String> },

    /// Ecosystem tag matched no supported backend
    #[error("Unsupported ecosystem: {tag}")]
    UnsupportedEcosystem { tag: String },

    /// Installer binary could not be spawned
    #[error("Installer '{program}' unavailable: {message}")]
    InstallerUnavailable { program: String, message: String },

    /// Installer ran but exited nonzero
    #[error("Install of '{package}' failed (exit code {exit_code:?})")]
    InstallFailed {
        package: String,
        exit_code: Option<i32>,
        output: String,
    },

    /// The audit append failed; the invocation's true state is unaudited.
    /// `install_succeeded` reports what actually happened so the caller is
    /// never told a partial-failure was a clean success.
    #[error("Audit write failed, install state unverified: {message}")]
    AuditWriteFailed {
        install_succeeded: Option<bool>,
        message: String,
    },
}

impl GatewayError {
    /// Distinct process exit code per failure class
    pub fn exit_code(&self) -> i32 {
        match self {
            GatewayError::NotFound { .. } => 2,
            GatewayError::PolicyDenied { .. } => 3,
            GatewayError::UnsupportedEcosystem { .. } => 4,
            GatewayError::InstallerUnavailable { .. } => 5,
            GatewayError::InstallFailed { .. } => 6,
            GatewayError::AuditWriteFailed { .. } => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            GatewayError::NotFound {
                name: "x".to_string(),
            },
            GatewayError::PolicyDenied {
                package: "x".to_string(),
                reasons: vec![],
            },
            GatewayError::UnsupportedEcosystem {
                tag: "cargo".to_string(),
            },
            GatewayError::InstallerUnavailable {
                program: "pip".to_string(),
                message: "missing".to_string(),
            },
            GatewayError::InstallFailed {
                package: "x".to_string(),
                exit_code: Some(1),
                output: String::new(),
            },
            GatewayError::AuditWriteFailed {
                install_succeeded: None,
                message: "disk full".to_string(),
            },
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|&c| c != 0));
    }
}
