//! tm-core - Core library for Tidemark
//!
//! This crate provides the migration data model (versions, script names,
//! scripts), script discovery, version-based selection, and configuration
//! parsing shared by the runner and the CLI.

pub mod config;
pub mod error;
pub mod filter;
pub mod repository;
pub mod script;
pub mod script_name;
pub mod version;

pub use config::{CommitMode, Config, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use filter::{select, SelectedScript};
pub use repository::ScriptRepository;
pub use script::MigrationScript;
pub use script_name::{parse_script_name, ParsedScriptName, ScriptName};
pub use version::Version;
