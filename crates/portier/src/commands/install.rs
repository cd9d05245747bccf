//! Install command - run the validation-and-installation pipeline
//!
//! Exit codes: 0 success, 2 not found, 3 policy denied, 4 unsupported
//! ecosystem, 5 installer unavailable, 6 install failed, 7 audit write
//! failed. Scripts can branch on these.

use anyhow::Result;
use portier_audit::AuditTrail;
use portier_core::{IntentStatus, PortierConfig};
use portier_gateway::{Gateway, GatewayError, GatewayOptions};
use portier_install::InstallerRouter;
use portier_policy::IntentValidator;
use std::path::Path;
use std::sync::Arc;

use crate::cli::InstallArgs;
use crate::output;

pub async fn run(args: InstallArgs, registry_path: Option<&Path>) -> Result<()> {
    let config = PortierConfig::load_default()?;
    let registry = Arc::new(super::load_registry(
        registry_path,
        config.registry_url.clone(),
    )?);

    let mut options = GatewayOptions::from_config(&config);
    if let Some(min_trust) = args.min_trust {
        options.min_trust = min_trust;
    }
    options.force = args.force;

    let gateway = Gateway::new(
        registry,
        IntentValidator::new(config.intent_endpoint.clone()),
        Arc::new(InstallerRouter::with_timeout_secs(
            config.install_timeout_secs,
        )),
        AuditTrail::load_default()?,
        options,
    );

    if !args.json {
        output::info(&format!("Validating package: {}", args.name));
    }

    match gateway.install(&args.name).await {
        Ok(report) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "decision": report.decision,
                        "install": report.install,
                        "audit_seq": report.audit_seq,
                        "forced": report.forced,
                    }))?
                );
                return Ok(());
            }

            print_decision_summary(&report.decision);
            if report.forced {
                output::warning("Policy verdict failed; installed with --force");
            }
            output::success(&format!(
                "{} installed via {} (audit #{})",
                report.install.package, report.install.backend, report.audit_seq
            ));
            Ok(())
        }
        Err(err) => {
            report_failure(&err);
            std::process::exit(err.exit_code());
        }
    }
}

fn print_decision_summary(decision: &portier_core::PolicyDecision) {
    output::kv("Verdict", &output::mark(decision.verdict));
    output::kv("Threshold", &format!("{}", decision.min_trust));
    if let Some(intent) = &decision.intent {
        let label = match intent.status {
            IntentStatus::Unchecked => "unchecked",
            IntentStatus::Clear => "clear",
            IntentStatus::Flagged => "flagged",
        };
        output::kv("Intent check", label);
    }
}

fn report_failure(err: &GatewayError) {
    match err {
        GatewayError::NotFound { name } => {
            output::error(&format!("Package '{}' not found", name));
            output::info(&format!("Try: portier search {}", name));
        }
        GatewayError::PolicyDenied { package, reasons } => {
            output::error(&format!("Package '{}' blocked by policy:", package));
            for reason in reasons {
                eprintln!("  - {}", reason);
            }
            output::info("Use --force to install anyway (not recommended)");
        }
        GatewayError::UnsupportedEcosystem { tag } => {
            output::error(&format!("No installer backend for ecosystem '{}'", tag));
        }
        GatewayError::InstallerUnavailable { program, message } => {
            output::error(&format!("Installer '{}' unavailable: {}", program, message));
            output::info("Run: portier doctor");
        }
        GatewayError::InstallFailed {
            package,
            exit_code,
            output: captured,
        } => {
            output::error(&format!(
                "Install of '{}' failed (exit code {:?})",
                package, exit_code
            ));
            if !captured.is_empty() {
                eprintln!("{}", captured);
            }
        }
        GatewayError::AuditWriteFailed {
            install_succeeded,
            message,
        } => {
            output::error(&format!("Audit write failed: {}", message));
            match install_succeeded {
                Some(true) => output::warning(
                    "The install itself succeeded but is NOT recorded; treat as partial failure",
                ),
                Some(false) => output::warning("The install failed and is NOT recorded"),
                None => output::warning("No install was attempted"),
            }
        }
    }
}
