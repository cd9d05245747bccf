//! List command - print the full package catalogue

use anyhow::Result;
use console::style;
use portier_core::PortierConfig;
use std::path::Path;

use crate::cli::ListArgs;
use crate::output;

pub fn run(args: ListArgs, registry_path: Option<&Path>) -> Result<()> {
    let config = PortierConfig::load_default()?;
    let registry = super::load_registry(registry_path, config.registry_url)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(registry.list_all())?);
        return Ok(());
    }

    output::header(&format!("Packages ({})", registry.len()));
    for record in registry.list_all() {
        println!(
            "  {:24} {:8} {:4} trust {:.2}  {} compliant  {} verified",
            style(&record.name).bold(),
            record.version,
            record.ecosystem,
            record.trust_score,
            output::mark(record.compliant),
            output::mark(record.verified),
        );
    }
    Ok(())
}
