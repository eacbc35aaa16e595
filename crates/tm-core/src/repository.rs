//! Script discovery from the script directory.

use crate::error::{CoreError, CoreResult};
use crate::script::MigrationScript;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Discovers migration scripts in a fixed directory.
///
/// Discovery is target-independent and needs no database connection.
#[derive(Debug, Clone)]
pub struct ScriptRepository {
    dir: PathBuf,
}

impl ScriptRepository {
    /// Create a repository rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The script directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List every regular file in the script directory, in directory order.
    ///
    /// A missing directory yields an empty list. Sub-directories are skipped.
    /// No sorting or name validation happens here.
    pub fn discover(&self) -> CoreResult<Vec<MigrationScript>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!(
                    "Script directory {} not found, no migrations to run",
                    self.dir.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.discovery_error(e)),
        };

        let mut scripts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.discovery_error(e))?;
            let file_type = entry.file_type().map_err(|e| self.discovery_error(e))?;
            let path = entry.path();

            if file_type.is_dir() {
                log::debug!("Skipping directory {}", path.display());
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            scripts.push(MigrationScript::new(name, path));
        }

        log::debug!(
            "Discovered {} script(s) in {}",
            scripts.len(),
            self.dir.display()
        );
        Ok(scripts)
    }

    fn discovery_error(&self, source: io::Error) -> CoreError {
        CoreError::Discovery {
            path: self.dir.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;
