//! Installation pipeline
//!
//! Orchestrates one gateway invocation in a fixed sequence: registry
//! lookup, static policy evaluation, optional intent check, installer
//! dispatch, audit write. Installation is attempted iff the policy verdict
//! is true; every invocation -- including aborts before the install step --
//! writes exactly one audit record before the final status is reported.
//!
//! Invocations are independent: the registry is shared read-only and the
//! audit trail serializes its own appends, so concurrent installs are safe.

mod error;

pub use error::GatewayError;

use portier_audit::AuditTrail;
use portier_core::config::DEFAULT_MIN_TRUST;
use portier_core::{
    InstallResult, IntentStatus, Outcome, PackageRecord, PolicyDecision, PortierConfig,
};
use portier_install::{InstallError, Installer};
use portier_policy::IntentValidator;
use portier_registry::Registry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-gateway configuration knobs
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Minimum trust score the policy requires
    pub min_trust: f64,

    /// Deny installation when the intent check comes back flagged
    pub deny_on_flagged: bool,

    /// Proceed past a policy denial. The failing decision snapshot is
    /// still recorded, so the bypass stays visible in the audit trail.
    pub force: bool,

    /// Actor/context tag written into audit records
    pub actor: String,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            min_trust: DEFAULT_MIN_TRUST,
            deny_on_flagged: false,
            force: false,
            actor: "cli".to_string(),
        }
    }
}

impl GatewayOptions {
    /// Options derived from user configuration
    pub fn from_config(config: &PortierConfig) -> Self {
        Self {
            min_trust: config.min_trust,
            deny_on_flagged: config.deny_on_flagged,
            ..Default::default()
        }
    }
}

/// Final report for a completed (installed) invocation
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// The decision the install was based on
    pub decision: PolicyDecision,

    /// Captured installer outcome
    pub install: InstallResult,

    /// Sequence number of the audit record documenting this invocation
    pub audit_seq: u64,

    /// True when a failing verdict was bypassed with force
    pub forced: bool,
}

/// The validation-and-installation pipeline
pub struct Gateway {
    registry: Arc<Registry>,
    intent: IntentValidator,
    installer: Arc<dyn Installer>,
    trail: AuditTrail,
    options: GatewayOptions,
}

impl Gateway {
    pub fn new(
        registry: Arc<Registry>,
        intent: IntentValidator,
        installer: Arc<dyn Installer>,
        trail: AuditTrail,
        options: GatewayOptions,
    ) -> Self {
        Self {
            registry,
            intent,
            installer,
            trail,
            options,
        }
    }

    /// The registry this gateway reads from
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the pipeline for one requested package.
    ///
    /// Terminal errors map to distinct exit codes via
    /// [`GatewayError::exit_code`]; an audit-write failure always takes
    /// precedence in the report because it means the recorded history no
    /// longer reflects what happened.
    pub async fn install(&self, name: &str) -> Result<InstallReport, GatewayError> {
        debug!("Pipeline start for '{}'", name);

        // Lookup
        let record = match self.registry.lookup(name) {
            Ok(record) => record,
            Err(_) => {
                self.audit(name, Outcome::NotFound, None, None)?;
                return Err(GatewayError::NotFound {
                    name: name.to_string(),
                });
            }
        };

        // Evaluate, then layer the optional intent signal on before the
        // decision is finalized for the audit snapshot
        let mut decision = portier_policy::evaluate(record, self.options.min_trust);
        if self.intent.configured() {
            let check = self.intent.check_injection(&intent_text(record)).await;
            if check.status == IntentStatus::Flagged {
                warn!(
                    "Intent check flagged '{}': {}",
                    record.name,
                    check.rationale.as_deref().unwrap_or("no rationale")
                );
                if self.options.deny_on_flagged {
                    decision.verdict = false;
                    decision
                        .reasons
                        .push("intent check flagged the package".to_string());
                }
            }
            decision.intent = Some(check);
        }

        // Decide
        let forced = !decision.verdict && self.options.force;
        if !decision.verdict && !forced {
            self.audit(&record.name, Outcome::PolicyDenied, Some(decision.clone()), None)?;
            return Err(GatewayError::PolicyDenied {
                package: record.name.clone(),
                reasons: decision.reasons,
            });
        }
        if forced {
            warn!("Forcing install of '{}' past a failing policy verdict", record.name);
        }

        // Install
        let result = match self.installer.install(record).await {
            Ok(result) => result,
            Err(InstallError::UnsupportedEcosystem { tag }) => {
                self.audit(
                    &record.name,
                    Outcome::UnsupportedEcosystem,
                    Some(decision.clone()),
                    None,
                )?;
                return Err(GatewayError::UnsupportedEcosystem { tag });
            }
            Err(InstallError::Unavailable { program, message }) => {
                self.audit(
                    &record.name,
                    Outcome::InstallerUnavailable,
                    Some(decision.clone()),
                    None,
                )?;
                return Err(GatewayError::InstallerUnavailable { program, message });
            }
        };

        // Audit, then report
        let outcome = if result.success {
            Outcome::Installed
        } else {
            Outcome::InstallFailed
        };
        let audit_record = self
            .trail
            .record(
                &record.name,
                outcome,
                Some(decision.clone()),
                Some(result.clone()),
                &self.options.actor,
            )
            .map_err(|e| GatewayError::AuditWriteFailed {
                install_succeeded: Some(result.success),
                message: e.to_string(),
            })?;

        if !result.success {
            return Err(GatewayError::InstallFailed {
                package: record.name.clone(),
                exit_code: result.exit_code,
                output: combined_output(&result),
            });
        }

        info!("Pipeline done for '{}' (audit #{})", record.name, audit_record.seq);
        Ok(InstallReport {
            decision,
            install: result,
            audit_seq: audit_record.seq,
            forced,
        })
    }

    /// Write an abort record; a failure here surfaces as AuditWriteFailed
    /// with no install state (nothing was attempted yet).
    fn audit(
        &self,
        package: &str,
        outcome: Outcome,
        decision: Option<PolicyDecision>,
        install: Option<InstallResult>,
    ) -> Result<(), GatewayError> {
        self.trail
            .record(package, outcome, decision, install, &self.options.actor)
            .map(|_| ())
            .map_err(|e| GatewayError::AuditWriteFailed {
                install_succeeded: None,
                message: e.to_string(),
            })
    }
}

/// Text submitted to the intent classifier for a record
fn intent_text(record: &PackageRecord) -> String {
    format!("install {}: {}", record.name, record.description)
}

fn combined_output(result: &InstallResult) -> String {
    let mut out = String::new();
    if !result.stdout.trim().is_empty() {
        out.push_str(result.stdout.trim_end());
    }
    if !result.stderr.trim().is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(result.stderr.trim_end());
    }
    out
}
