//! Audit command - inspect and verify the audit trail

use anyhow::Result;
use console::style;
use portier_audit::{AuditTrail, HistoryFilter};

use crate::cli::AuditArgs;
use crate::output;

pub fn run(args: AuditArgs) -> Result<()> {
    let trail = AuditTrail::load_default()?;

    if args.verify {
        return verify(&trail, args.json);
    }

    let filter = HistoryFilter {
        package: args.package,
        limit: args.limit,
    };
    let records = trail.history(&filter)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        output::info("No audit records");
        return Ok(());
    }

    output::header(&format!("Audit trail ({} records)", records.len()));
    for record in &records {
        println!(
            "  #{:<4} {}  {:24} {}  [{}]",
            record.seq,
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            style(&record.package).bold(),
            record.outcome.describe(),
            record.actor,
        );
        if let Some(decision) = &record.decision {
            for reason in &decision.reasons {
                println!("         - {}", reason);
            }
        }
    }
    Ok(())
}

fn verify(trail: &AuditTrail, json: bool) -> Result<()> {
    match trail.verify() {
        Ok(count) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "intact": true,
                        "records": count,
                    }))?
                );
            } else {
                output::success(&format!("Audit chain intact: {} record(s) verified", count));
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "intact": false,
                        "error": e.to_string(),
                    }))?
                );
            } else {
                output::error(&e.to_string());
            }
            std::process::exit(1);
        }
    }
}
