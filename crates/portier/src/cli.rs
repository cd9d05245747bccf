//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Portier - package-installation gateway
#[derive(Parser, Debug)]
#[command(name = "portier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a registry index file (overrides cache and bundled index)
    #[arg(short, long, global = true)]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all packages in the registry
    List(ListArgs),

    /// Search packages by keyword
    Search(SearchArgs),

    /// Show package details
    Info(InfoArgs),

    /// Validate and install a package
    Install(InstallArgs),

    /// Check installer backends and the intent endpoint
    Doctor(DoctorArgs),

    /// Refresh the registry cache from the remote index
    Update(UpdateArgs),

    /// Inspect the audit trail
    Audit(AuditArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search keyword (matched against name and description)
    pub keyword: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Package name
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Package name
    pub name: String,

    /// Minimum trust score (overrides configuration)
    #[arg(long)]
    pub min_trust: Option<f64>,

    /// Install even if the policy verdict fails (the denial is still
    /// recorded in the audit trail)
    #[arg(short, long)]
    pub force: bool,

    /// Output the final report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {}

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Only records for this package
    #[arg(short, long)]
    pub package: Option<String>,

    /// Show at most the N most recent records
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Verify the hash chain instead of printing history
    #[arg(long)]
    pub verify: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
