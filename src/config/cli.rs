use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "service-orchestrator")]
#[command(about = "Resolves a service request to authorized provider bindings")]
pub struct CliArgs {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "orchestrator.toml")]
    pub config: PathBuf,

    /// Path to a JSON service request
    #[arg(short, long)]
    pub request: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON regardless of the configuration
    #[arg(long)]
    pub json_logs: bool,

    /// Validate configuration and request without calling any collaborator
    #[arg(long)]
    pub dry_run: bool,
}
