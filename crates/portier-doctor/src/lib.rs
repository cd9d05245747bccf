//! Environment diagnostics
//!
//! Checks that the installer backends Portier routes to are actually
//! usable on this machine (binary on PATH, responds to a version probe)
//! and that the optional intent endpoint is reachable. Backend checks run
//! in parallel; each probe is bounded by a short timeout.

use futures::future::join_all;
use portier_install::Backend;
use serde::Serialize;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Timeout for each individual probe
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// State of one diagnostic check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    /// Probe succeeded
    Ok,
    /// Binary not found on PATH
    Missing,
    /// Binary present but the probe failed or timed out
    Unresponsive,
    /// Endpoint did not answer within the timeout
    Unreachable,
    /// Nothing configured to check
    NotConfigured,
}

/// Outcome of one diagnostic check
#[derive(Debug, Clone, Serialize)]
pub struct CheckStatus {
    /// What was checked ("pip backend", "intent endpoint")
    pub name: String,

    pub state: CheckState,

    /// Version string or probe detail, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Whether the gateway needs this check to pass to be usable
    pub required: bool,
}

/// Full diagnostic report
#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub checks: Vec<CheckStatus>,
}

impl DoctorReport {
    /// True when every required check passed. The intent endpoint is
    /// advisory (the gateway fails open without it) so it never blocks
    /// readiness.
    pub fn is_ready(&self) -> bool {
        self.checks
            .iter()
            .filter(|c| c.required)
            .all(|c| c.state == CheckState::Ok)
    }
}

/// Runs the diagnostic checks
pub struct Doctor {
    timeout: Duration,
}

impl Doctor {
    pub fn new() -> Self {
        Self {
            timeout: CHECK_TIMEOUT,
        }
    }

    /// Run all checks: one per installer backend, plus the intent
    /// endpoint when configured.
    pub async fn run(&self, intent_endpoint: Option<&str>) -> DoctorReport {
        let backend_futures: Vec<_> = Backend::all()
            .iter()
            .map(|backend| self.check_backend(*backend))
            .collect();
        let mut checks = join_all(backend_futures).await;
        checks.push(self.check_endpoint(intent_endpoint).await);
        DoctorReport { checks }
    }

    async fn check_backend(&self, backend: Backend) -> CheckStatus {
        let name = format!("{} backend ({})", backend.tag(), backend.program());

        if which::which(backend.program()).is_err() {
            return CheckStatus {
                name,
                state: CheckState::Missing,
                detail: Some("binary not found in PATH".to_string()),
                required: true,
            };
        }

        let probe = tokio::time::timeout(self.timeout, async {
            Command::new(backend.program()).arg("--version").output().await
        })
        .await;

        match probe {
            Ok(Ok(output)) if output.status.success() => {
                let text = if output.stdout.is_empty() {
                    String::from_utf8_lossy(&output.stderr).into_owned()
                } else {
                    String::from_utf8_lossy(&output.stdout).into_owned()
                };
                CheckStatus {
                    name,
                    state: CheckState::Ok,
                    detail: text.lines().next().map(|l| l.trim().to_string()),
                    required: true,
                }
            }
            _ => {
                debug!("Version probe failed for {}", backend.program());
                CheckStatus {
                    name,
                    state: CheckState::Unresponsive,
                    detail: None,
                    required: true,
                }
            }
        }
    }

    async fn check_endpoint(&self, endpoint: Option<&str>) -> CheckStatus {
        let name = "intent endpoint".to_string();
        let Some(url) = endpoint else {
            return CheckStatus {
                name,
                state: CheckState::NotConfigured,
                detail: None,
                required: false,
            };
        };

        let client = match reqwest::Client::builder().timeout(self.timeout).build() {
            Ok(client) => client,
            Err(_) => reqwest::Client::new(),
        };

        match client.get(url).send().await {
            Ok(response) => CheckStatus {
                name,
                state: CheckState::Ok,
                detail: Some(format!("HTTP {}", response.status())),
                required: false,
            },
            Err(e) => CheckStatus {
                name,
                state: CheckState::Unreachable,
                detail: Some(e.to_string()),
                required: false,
            },
        }
    }
}

impl Default for Doctor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_report_covers_all_backends_plus_endpoint() {
        let doctor = Doctor::new();
        let report = doctor.run(None).await;
        assert_eq!(report.checks.len(), Backend::all().len() + 1);
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_never_blocks_readiness() {
        let doctor = Doctor::new();
        let report = doctor.run(None).await;
        let endpoint = report.checks.last().unwrap();
        assert_eq!(endpoint.state, CheckState::NotConfigured);
        assert!(!endpoint.required);
    }

    #[tokio::test]
    async fn test_reachable_endpoint_reports_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let doctor = Doctor::new();
        let report = doctor.run(Some(&server.uri())).await;
        let endpoint = report.checks.last().unwrap();
        assert_eq!(endpoint.state, CheckState::Ok);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_unreachable() {
        let doctor = Doctor::new();
        let report = doctor.run(Some("http://127.0.0.1:1/")).await;
        let endpoint = report.checks.last().unwrap();
        assert_eq!(endpoint.state, CheckState::Unreachable);
        // Advisory: readiness depends on backends only
        assert!(!endpoint.required);
    }

    #[test]
    fn test_is_ready_ignores_optional_failures() {
        let report = DoctorReport {
            checks: vec![
                CheckStatus {
                    name: "pip backend (python3)".to_string(),
                    state: CheckState::Ok,
                    detail: None,
                    required: true,
                },
                CheckStatus {
                    name: "intent endpoint".to_string(),
                    state: CheckState::Unreachable,
                    detail: None,
                    required: false,
                },
            ],
        };
        assert!(report.is_ready());
    }

    #[test]
    fn test_is_ready_fails_on_missing_backend() {
        let report = DoctorReport {
            checks: vec![CheckStatus {
                name: "npm backend (npm)".to_string(),
                state: CheckState::Missing,
                detail: None,
                required: true,
            }],
        };
        assert!(!report.is_ready());
    }
}
