//! Doctor command - environment diagnostics

use anyhow::Result;
use portier_core::PortierConfig;
use portier_doctor::{CheckState, Doctor};

use crate::cli::DoctorArgs;
use crate::output;

pub async fn run(args: DoctorArgs) -> Result<()> {
    let config = PortierConfig::load_default()?;

    let doctor = Doctor::new();
    let report = doctor.run(config.intent_endpoint.as_deref()).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        if !report.is_ready() {
            std::process::exit(1);
        }
        return Ok(());
    }

    output::header("Environment check");
    for check in &report.checks {
        let line = match &check.detail {
            Some(detail) => format!("{}: {}", check.name, detail),
            None => check.name.clone(),
        };
        match check.state {
            CheckState::Ok => output::success(&line),
            CheckState::NotConfigured => output::info(&format!("{} (not configured)", line)),
            CheckState::Unreachable if !check.required => output::warning(&line),
            _ => output::error(&line),
        }
    }

    if report.is_ready() {
        output::success("All required checks passed");
        Ok(())
    } else {
        output::error("Some required checks failed");
        std::process::exit(1);
    }
}
