//! Error types for tm-migrate

use thiserror::Error;
use tm_core::CoreError;
use tm_db::DbError;

/// Migration run errors.
///
/// Every variant is fatal for the target it occurred on and for that target
/// only.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Discovery, name validation, or selection failed
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The target provider could not supply a connection (M001)
    #[error("[M001] Failed to connect to target '{target}': {source}")]
    Connection { target: String, source: DbError },

    /// The high-water mark could not be read (M002)
    #[error("[M002] Failed to read last_run_migration from '{table}': {message}")]
    StateRead { table: String, message: String },

    /// A script file could not be read at execution time (M003)
    #[error("[M003] Failed to read script {script}: {source}")]
    ScriptRead {
        script: String,
        source: std::io::Error,
    },

    /// A script's SQL failed; later scripts were not attempted (M004)
    #[error("[M004] Script {script} failed: {source}")]
    ScriptExecution { script: String, source: DbError },

    /// The high-water mark could not be written (M005)
    #[error("[M005] Failed to record last_run_migration = {version}: {source}")]
    Persist { version: String, source: DbError },

    /// State table name is not a plain identifier (M006)
    #[error("[M006] Invalid state table name '{0}'")]
    InvalidStateTable(String),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
