//! Remote intent analysis
//!
//! Sends free text (a package description, an install argument) to a
//! local/offline inference endpoint that classifies it as intent-safe or
//! injection-flagged. The signal is supplementary and fails open: an
//! unconfigured, unreachable, or slow endpoint yields `Unchecked`, never
//! an error, because its absence must not block an otherwise-compliant
//! install. The static policy in the crate root remains the gate.

use portier_core::{IntentCheck, IntentStatus};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Hard bound on the classification call
const INTENT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct CheckRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    flagged: bool,
    #[serde(default)]
    rationale: Option<String>,
}

/// Client for the optional intent-analysis endpoint
pub struct IntentValidator {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl IntentValidator {
    /// Create a validator; `None` disables checking entirely (every call
    /// returns `Unchecked` without network traffic).
    pub fn new(endpoint: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(INTENT_TIMEOUT)
            .build()
            // Builder only fails on TLS backend misconfiguration; fall back
            // to a default client rather than poisoning construction.
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { endpoint, client }
    }

    /// Whether an endpoint is configured
    pub fn configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Classify text for injection intent.
    ///
    /// Timeout, transport errors, non-2xx responses, and undecodable
    /// bodies are all treated as "endpoint unavailable" and reported as
    /// `Unchecked`.
    pub async fn check_injection(&self, text: &str) -> IntentCheck {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return IntentCheck::unchecked("intent endpoint not configured");
        };

        let response = match self
            .client
            .post(endpoint)
            .json(&CheckRequest { prompt: text })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("Intent check unavailable: {}", e);
                return IntentCheck::unchecked("intent endpoint unreachable");
            }
        };

        if !response.status().is_success() {
            debug!("Intent check returned HTTP {}", response.status());
            return IntentCheck::unchecked(format!(
                "intent endpoint returned HTTP {}",
                response.status()
            ));
        }

        match response.json::<CheckResponse>().await {
            Ok(body) => IntentCheck {
                status: if body.flagged {
                    IntentStatus::Flagged
                } else {
                    IntentStatus::Clear
                },
                rationale: body.rationale,
            },
            Err(e) => {
                debug!("Intent check returned undecodable body: {}", e);
                IntentCheck::unchecked("intent endpoint returned undecodable body")
            }
        }
    }
}
