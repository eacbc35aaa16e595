//! Error types for tm-db

use thiserror::Error;

/// Failures talking to a target database
#[derive(Error, Debug)]
pub enum DbError {
    /// The database could not be opened or provisioned (D001)
    #[error("[D001] Cannot open target database: {0}")]
    ConnectionError(String),

    /// A statement or script batch was rejected (D002)
    #[error("[D002] Statement failed: {0}")]
    ExecutionError(String),

    /// A read query failed (D003)
    #[error("[D003] Query failed: {0}")]
    QueryError(String),

    /// A previous holder of the connection panicked (D004)
    #[error("[D004] Connection lock poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result alias for tm-db operations
pub type DbResult<T> = Result<T, DbError>;
