//! Migration script handle.

use crate::script_name::{parse_script_name, ScriptName};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A migration script discovered in the script directory.
///
/// The SQL payload is not loaded at discovery time; it is read when the
/// script is about to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    name: String,
    path: PathBuf,
}

impl MigrationScript {
    /// Create a script handle from its file name and location.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Full file name, e.g. `20230101000000_init.sql`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the script on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse this script's file name.
    pub fn parse_name(&self) -> ScriptName {
        parse_script_name(&self.name)
    }

    /// Read the SQL payload.
    pub fn read_sql(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}
