//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Stevedore - builder registry and pre-build hooks for native extensions
#[derive(Parser)]
#[command(name = "stevedore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Stevedore.toml (or the directory holding it)
    #[arg(long, global = true, env = "STEVEDORE_MANIFEST")]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pre-build pass and print the build actions
    Plan(PlanArgs),

    /// List registered targets per subsystem
    Targets(TargetsArgs),

    /// Invoke every builder and report misconfigured targets
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for machine consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MessageFormat {
    /// Human-readable text
    #[default]
    Human,
    /// One JSON object per line
    Json,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Specific targets to plan
    #[arg(long)]
    pub target: Vec<String>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Only list targets of this subsystem
    #[arg(long)]
    pub subsystem: Option<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
