//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Config file names looked up in the project directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["tidemark.yml", "tidemark.yaml"];

/// Main project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing migration scripts
    #[serde(default = "default_scripts_path")]
    pub scripts_path: String,

    /// Table holding each target's `last_run_migration` row
    #[serde(default = "default_state_table")]
    pub state_table: String,

    /// When the high-water mark is written
    #[serde(default)]
    pub commit_mode: CommitMode,

    /// Targets to migrate, in run order
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetConfig>,
}

/// A named database to migrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Target name (e.g. development)
    pub name: String,

    /// Database path (file-based or :memory:)
    pub path: String,
}

/// High-water mark write strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    /// Write once, after every selected script has been applied (default)
    #[default]
    Batch,
    /// Write after each script that applies successfully
    PerScript,
}

impl std::fmt::Display for CommitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitMode::Batch => write!(f, "batch"),
            CommitMode::PerScript => write!(f, "per_script"),
        }
    }
}

const DEFAULT_SCRIPTS_PATH: &str = "scripts/migrations";

const DEFAULT_STATE_TABLE: &str = "migration";

const DEFAULT_TARGET_NAMES: &[&str] = &["development", "unit-test", "functional-test"];

fn default_scripts_path() -> String {
    DEFAULT_SCRIPTS_PATH.to_string()
}

fn default_state_table() -> String {
    DEFAULT_STATE_TABLE.to_string()
}

fn default_targets() -> Vec<TargetConfig> {
    DEFAULT_TARGET_NAMES
        .iter()
        .map(|name| TargetConfig {
            name: name.to_string(),
            path: format!("target/{name}.duckdb"),
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scripts_path: default_scripts_path(),
            state_table: default_state_table(),
            commit_mode: CommitMode::default(),
            targets: default_targets(),
        }
    }
}

impl Config {
    /// Read and validate a config file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for tidemark.yml or tidemark.yaml and falls back to the built-in
    /// defaults when neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                log::debug!("Loading config from {}", path.display());
                return Self::load(&path);
            }
        }
        log::debug!(
            "No config file in {}, using built-in defaults",
            dir.display()
        );
        Ok(Self::default())
    }

    /// Check the rules serde cannot express
    pub fn validate(&self) -> CoreResult<()> {
        if self.scripts_path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "scripts_path cannot be empty".to_string(),
            });
        }

        if !is_plain_identifier(&self.state_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "state_table '{}' must be a plain identifier (letters, digits, underscores, optionally schema-qualified)",
                    self.state_table
                ),
            });
        }

        if self.targets.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one target must be configured".to_string(),
            });
        }

        let mut names = HashSet::new();
        for target in &self.targets {
            if target.name.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "Target name cannot be empty".to_string(),
                });
            }
            if target.path.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Target '{}' has an empty path", target.name),
                });
            }
            if !names.insert(target.name.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Duplicate target name '{}'", target.name),
                });
            }
        }

        Ok(())
    }

    /// Get the script directory relative to a project root
    pub fn scripts_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.scripts_path)
    }

    /// Look up a target by name
    pub fn get_target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Target names in run order
    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }
}

impl TargetConfig {
    /// Resolve the database path against a project root.
    ///
    /// `:memory:` and absolute paths are returned unchanged.
    pub fn resolve_path(&self, root: &Path) -> String {
        if self.path == ":memory:" || Path::new(&self.path).is_absolute() {
            self.path.clone()
        } else {
            root.join(&self.path).display().to_string()
        }
    }
}

/// Whether `name` is safe to splice into SQL as a (possibly schema-qualified)
/// table name.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut parts = 0;
    for part in name.split('.') {
        parts += 1;
        let mut chars = part.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
    }
    parts <= 2
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
