//! Installer routing and execution
//!
//! Maps a package record's ecosystem tag onto a closed set of installer
//! backends and runs the matching package manager as a subprocess. The
//! router captures exit code and output verbatim and never interprets
//! installer output -- correctness of the underlying package manager is
//! outside this system's responsibility.

mod backend;

pub use backend::Backend;

use async_trait::async_trait;
use chrono::Utc;
use portier_core::{InstallResult, PackageRecord};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Default wall-clock bound for one installer invocation
const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Errors distinct from a completed-but-failed install
#[derive(Error, Debug)]
pub enum InstallError {
    /// Ecosystem tag matched no supported backend; nothing was spawned
    #[error("Unsupported ecosystem: {tag}. Supported: pip, npm")]
    UnsupportedEcosystem { tag: String },

    /// The installer binary could not be spawned at all
    #[error("Installer '{program}' unavailable: {message}")]
    Unavailable { program: String, message: String },
}

/// Seam between the pipeline and concrete installer execution.
///
/// The production implementation is [`InstallerRouter`]; tests substitute
/// stubs to exercise pipeline behavior without touching real package
/// managers.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install the record's target, capturing the subprocess outcome
    async fn install(&self, record: &PackageRecord) -> Result<InstallResult, InstallError>;
}

/// Routes records to installer backends and executes them
pub struct InstallerRouter {
    timeout: Duration,
}

impl InstallerRouter {
    /// Router with the default 600s wall-clock bound
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_INSTALL_TIMEOUT,
        }
    }

    /// Router with a custom wall-clock bound (seconds)
    pub fn with_timeout_secs(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Run a program with args, capturing output and classifying success
    /// as exit code zero. Spawn failure surfaces as `Unavailable`; an
    /// expired wall-clock bound kills the child and reports a failed
    /// result (no rollback of whatever the installer already did).
    async fn run(
        &self,
        program: &str,
        args: &[String],
        package: &str,
        backend_tag: &str,
    ) -> Result<InstallResult, InstallError> {
        debug!("Spawning {} {}", program, args.join(" "));

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| InstallError::Unavailable {
                program: program.to_string(),
                message: match e.kind() {
                    std::io::ErrorKind::NotFound => "binary not found in PATH".to_string(),
                    _ => e.to_string(),
                },
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                // The process spawned but could not be awaited
                return Err(InstallError::Unavailable {
                    program: program.to_string(),
                    message: e.to_string(),
                });
            }
            Err(_) => {
                warn!(
                    "Installer for '{}' exceeded {:?}; child killed",
                    package, self.timeout
                );
                return Ok(InstallResult {
                    package: package.to_string(),
                    backend: backend_tag.to_string(),
                    exit_code: None,
                    stdout: String::new(),
                    stderr: format!("installer timed out after {:?}", self.timeout),
                    success: false,
                    timestamp: Utc::now(),
                });
            }
        };

        let result = InstallResult {
            package: package.to_string(),
            backend: backend_tag.to_string(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            timestamp: Utc::now(),
        };

        if result.success {
            info!("Installed '{}' via {}", package, backend_tag);
        } else {
            info!(
                "Install of '{}' via {} failed (exit code {:?})",
                package, backend_tag, result.exit_code
            );
        }

        Ok(result)
    }
}

impl Default for InstallerRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Installer for InstallerRouter {
    async fn install(&self, record: &PackageRecord) -> Result<InstallResult, InstallError> {
        let backend = Backend::for_tag(&record.ecosystem).ok_or_else(|| {
            InstallError::UnsupportedEcosystem {
                tag: record.ecosystem.clone(),
            }
        })?;

        let args = backend.install_args(&record.target);
        self.run(backend.program(), &args, &record.name, backend.tag())
            .await
    }
}
