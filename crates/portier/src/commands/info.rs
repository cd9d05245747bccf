//! Info command - full details for one package

use anyhow::Result;
use portier_core::PortierConfig;
use std::path::Path;

use crate::cli::InfoArgs;
use crate::output;

pub fn run(args: InfoArgs, registry_path: Option<&Path>) -> Result<()> {
    let config = PortierConfig::load_default()?;
    let registry = super::load_registry(registry_path, config.registry_url)?;

    let record = match registry.lookup(&args.name) {
        Ok(record) => record,
        Err(e) => {
            output::error(&e.to_string());
            output::info(&format!("Try: portier search {}", args.name));
            std::process::exit(2);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    output::header(&record.name);
    output::kv("Version", &record.version);
    output::kv("Description", &record.description);
    output::kv("Author", &record.author);
    output::kv("Ecosystem", &record.ecosystem);
    output::kv("Target", &record.target);
    output::kv("Trust score", &format!("{:.2}", record.trust_score));
    output::kv("Compliant", &output::mark(record.compliant));
    output::kv("Verified", &output::mark(record.verified));
    if !record.dependencies.is_empty() {
        output::kv("Dependencies", &record.dependencies.join(", "));
    }
    Ok(())
}
