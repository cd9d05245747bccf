//! Search command - keyword match over name and description

use anyhow::Result;
use console::style;
use portier_core::PortierConfig;
use std::path::Path;

use crate::cli::SearchArgs;
use crate::output;

pub fn run(args: SearchArgs, registry_path: Option<&Path>) -> Result<()> {
    let config = PortierConfig::load_default()?;
    let registry = super::load_registry(registry_path, config.registry_url)?;

    let results = registry.search(&args.keyword);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        output::warning(&format!("No packages found for '{}'", args.keyword));
        return Ok(());
    }

    output::header(&format!("Results for '{}'", args.keyword));
    for record in &results {
        println!("  {} v{}", style(&record.name).bold(), record.version);
        println!("    {}", record.description);
        println!(
            "    trust {:.2} | {} | target {}",
            record.trust_score, record.ecosystem, record.target
        );
    }
    println!("\n  {} package(s) found", results.len());
    Ok(())
}
