//! New command implementation

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tm_core::{ScriptRepository, Version};

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::load_config;

/// Execute the new command
pub async fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let dir = config.scripts_path_absolute(&global.project_dir);

    let version = Version::from_datetime(chrono::Utc::now().naive_utc())
        .context("Current time cannot be expressed as a script version")?;
    let path = create_script(&ScriptRepository::new(dir), version, &args.description)?;

    println!("Created {}", path.display());
    Ok(())
}

/// Create an empty `<version>_<description>.sql` in the repository.
fn create_script(
    repository: &ScriptRepository,
    version: Version,
    description: &str,
) -> Result<PathBuf> {
    validate_description(description)?;

    let existing = repository.discover()?;
    let stamp = version.to_string();
    if let Some(clash) = existing.iter().find(|s| s.name().starts_with(&stamp)) {
        anyhow::bail!(
            "A script with version {} already exists: {}",
            stamp,
            clash.name()
        );
    }

    fs::create_dir_all(repository.dir()).with_context(|| {
        format!(
            "Failed to create scripts directory {}",
            repository.dir().display()
        )
    })?;

    let path = repository
        .dir()
        .join(format!("{}_{}.sql", stamp, description));
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(path)
}

fn validate_description(description: &str) -> Result<()> {
    if description.is_empty() {
        anyhow::bail!("Description must not be empty");
    }
    if let Some(c) = description
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        anyhow::bail!(
            "Invalid character '{}' in description '{}': use letters, digits, '_' or '-'",
            c,
            description
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
