//! Command line surface of the `tidemark` binary

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Tidemark - apply versioned SQL migration scripts to each configured database
///
/// With no subcommand, runs `migrate` against every configured target.
#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Options shared by every subcommand
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute (default: migrate)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags accepted before or after any subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Print debug logs and per-script progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory holding tidemark.yml and the scripts
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Use this config file instead of <project-dir>/tidemark.yml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migration scripts to each target
    Migrate(MigrateArgs),

    /// Show each target's last applied version and pending scripts
    Status(StatusArgs),

    /// Create a new, empty migration script stamped with the current time
    New(NewArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Only migrate these targets (repeatable, default: all in config order)
    #[arg(short, long)]
    pub target: Vec<String>,

    /// Record the last applied version after every script instead of once per run
    #[arg(long)]
    pub per_script_commit: bool,

    /// List the scripts that would be applied without executing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show these targets (repeatable, default: all in config order)
    #[arg(short, long)]
    pub target: Vec<String>,

    /// How to print the report
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Aligned columns
    Table,
    /// Pretty-printed JSON array
    Json,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Short description used in the file name (letters, digits, '_' and '-')
    pub description: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
