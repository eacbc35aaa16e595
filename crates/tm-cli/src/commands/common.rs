//! Shared helpers for CLI commands

use anyhow::{Context, Result};
use tm_core::Config;
use tm_migrate::{targets_from_config, Target};

use crate::cli::GlobalArgs;

/// Load configuration from `--config` or the project directory.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let config = match &global.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => Config::load_from_dir(&global.project_dir)
            .context("Failed to load project configuration")?,
    };
    log::debug!(
        "Loaded config: {} target(s), scripts at {}",
        config.targets.len(),
        config.scripts_path
    );
    Ok(config)
}

/// Build the targets to run, keeping config order.
///
/// An empty `names` selects every configured target. Unknown names are an
/// error so a typo never silently skips a database.
pub(crate) fn resolve_targets(
    config: &Config,
    global: &GlobalArgs,
    names: &[String],
) -> Result<Vec<Target>> {
    for name in names {
        if config.get_target(name).is_none() {
            anyhow::bail!(
                "Unknown target '{}'. Configured targets: {}",
                name,
                config.target_names().join(", ")
            );
        }
    }

    let targets = targets_from_config(config, &global.project_dir)
        .into_iter()
        .filter(|t| names.is_empty() || names.iter().any(|n| n == t.name()))
        .collect();
    Ok(targets)
}
