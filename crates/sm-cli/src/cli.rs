//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Stratum - versioned schema migrations for a catalog plus tenant databases
#[derive(Parser, Debug)]
#[command(name = "sm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the deployment config file
    #[arg(short, long, global = true, default_value = "stratum.yml")]
    pub config: String,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migration units to one target or all targets
    Apply(ApplyArgs),

    /// Revert applied migration units on one target
    Revert(RevertArgs),

    /// Show migration state per target
    Status(StatusArgs),

    /// Catch up a drifted target by applying its missing earlier units
    Reconcile(ReconcileArgs),

    /// List known migration units
    Ls(LsArgs),
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Target id to migrate
    #[arg(short, long, conflicts_with = "all")]
    pub target: Option<String>,

    /// Migrate the catalog and every tenant
    #[arg(long)]
    pub all: bool,

    /// Stop after this unit (ordering key); default is the latest.
    /// Keys are per-registry, so this only combines with a single target.
    #[arg(long, conflicts_with = "all")]
    pub up_to: Option<String>,
}

/// Arguments for the revert command
#[derive(Args, Debug)]
pub struct RevertArgs {
    /// Target id to revert
    #[arg(short, long)]
    pub target: String,

    /// Revert every applied unit at or after this key; default reverts all
    #[arg(long)]
    pub down_to: Option<String>,

    /// Revert past irreversible units, accepting data loss
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Target id; default shows every target
    #[arg(short, long)]
    pub target: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the reconcile command
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Target id to reconcile
    #[arg(short, long)]
    pub target: String,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
