//! Target providers: where a migration run gets its connection from.

use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Supplies one live connection per target run.
#[async_trait]
pub trait TargetProvider: Send + Sync {
    /// Open (or hand out) a connection for one run.
    async fn connect(&self) -> DbResult<Arc<dyn Database>>;

    /// Open the target for reading only, without creating or provisioning it.
    ///
    /// `None` means the target does not exist yet. Defaults to [`connect`].
    ///
    /// [`connect`]: TargetProvider::connect
    async fn connect_read_only(&self) -> DbResult<Option<Arc<dyn Database>>> {
        self.connect().await.map(Some)
    }

    /// Human-readable location of the target, for logging
    fn describe(&self) -> String;
}

/// Opens a DuckDB database file (or `:memory:`) for each run.
///
/// When a state table is set, the provider provisions it on connect so that
/// fresh databases start with an empty high-water mark.
#[derive(Debug, Clone)]
pub struct DuckDbProvider {
    path: String,
    state_table: Option<String>,
}

impl DuckDbProvider {
    /// Provider for the database at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state_table: None,
        }
    }

    /// Create `table` (with a `last_run_migration` column) if it is missing.
    ///
    /// The name is spliced into DDL; callers must pass a validated identifier.
    pub fn with_state_table(mut self, table: impl Into<String>) -> Self {
        self.state_table = Some(table.into());
        self
    }

    /// Database path this provider opens.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn ensure_parent_dir(&self) -> DbResult<()> {
        if self.path == ":memory:" {
            return Ok(());
        }
        match Path::new(&self.path).parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                log::debug!("Creating database directory {}", parent.display());
                std::fs::create_dir_all(parent).map_err(|e| {
                    DbError::ConnectionError(format!(
                        "failed to create directory {}: {e}",
                        parent.display()
                    ))
                })
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TargetProvider for DuckDbProvider {
    async fn connect(&self) -> DbResult<Arc<dyn Database>> {
        self.ensure_parent_dir()?;
        let db = DuckDbBackend::new(&self.path)?;

        if let Some(table) = &self.state_table {
            if let Some((schema, _)) = table.split_once('.') {
                db.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
                    .await?;
            }
            db.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (last_run_migration VARCHAR)"
            ))
            .await?;
        }

        Ok(Arc::new(db))
    }

    async fn connect_read_only(&self) -> DbResult<Option<Arc<dyn Database>>> {
        if self.path == ":memory:" {
            return Ok(Some(Arc::new(DuckDbBackend::in_memory()?)));
        }
        let path = Path::new(&self.path);
        if !path.exists() {
            log::debug!("{} does not exist yet", self.path);
            return Ok(None);
        }
        Ok(Some(Arc::new(DuckDbBackend::open_read_only(path)?)))
    }

    fn describe(&self) -> String {
        format!("duckdb:{}", self.path)
    }
}

/// Hands out an already-open connection.
///
/// Useful for embedding the runner in a process that owns its connection, and
/// for running several passes against one in-memory database.
#[derive(Clone)]
pub struct ExistingConnection {
    db: Arc<dyn Database>,
}

impl ExistingConnection {
    /// Wrap an open connection.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TargetProvider for ExistingConnection {
    async fn connect(&self) -> DbResult<Arc<dyn Database>> {
        Ok(Arc::clone(&self.db))
    }

    fn describe(&self) -> String {
        format!("existing {} connection", self.db.db_type())
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
