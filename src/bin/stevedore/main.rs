//! Stevedore CLI - builder registry and pre-build hooks for native extensions

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use stevedore::util::GlobalContext;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("stevedore=debug")
    } else {
        EnvFilter::new("stevedore=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    // Execute command
    match cli.command {
        Commands::Plan(args) => commands::plan::execute(&ctx, cli.manifest.as_deref(), args),
        Commands::Targets(args) => commands::targets::execute(&ctx, cli.manifest.as_deref(), args),
        Commands::Check(args) => commands::check::execute(&ctx, cli.manifest.as_deref(), args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
