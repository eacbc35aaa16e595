//! Tidemark CLI - versioned SQL migration runner

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands, MigrateArgs};
use commands::{migrate, new, status};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        None => migrate::execute(&MigrateArgs::default(), &cli.global).await,
        Some(Commands::Migrate(args)) => migrate::execute(args, &cli.global).await,
        Some(Commands::Status(args)) => status::execute(args, &cli.global).await,
        Some(Commands::New(args)) => new::execute(args, &cli.global).await,
    }
}

/// Route `log` output to stderr. `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
