//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Script directory exists but cannot be read
    #[error("[E001] Failed to read script directory '{path}': {source}")]
    Discovery {
        path: String,
        source: std::io::Error,
    },

    /// E002: Script file name does not follow `<version>_<description>`
    #[error("[E002] Malformed script name '{name}': {reason}")]
    MalformedScriptName { name: String, reason: String },

    /// E003: Two scripts share the same version prefix
    #[error("[E003] Duplicate script version {version}: '{first}' and '{second}'")]
    DuplicateVersion {
        version: String,
        first: String,
        second: String,
    },

    /// E004: Invalid version string
    #[error("[E004] Invalid version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    /// E005: Configuration file not found
    #[error("[E005] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E006: Invalid configuration value
    #[error("[E006] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E007: IO error with file path context
    #[error("[E007] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E008: YAML parse error
    #[error("[E008] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
