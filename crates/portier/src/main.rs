//! Portier CLI - validated package installation
//!
//! This is the main entry point for the Portier command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    // Run command
    match cli.command {
        Commands::List(args) => commands::list::run(args, cli.registry.as_deref()),
        Commands::Search(args) => commands::search::run(args, cli.registry.as_deref()),
        Commands::Info(args) => commands::info::run(args, cli.registry.as_deref()),
        Commands::Install(args) => commands::install::run(args, cli.registry.as_deref()).await,
        Commands::Doctor(args) => commands::doctor::run(args).await,
        Commands::Update(args) => commands::update::run(args).await,
        Commands::Audit(args) => commands::audit::run(args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
