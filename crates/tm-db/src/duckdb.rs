//! DuckDB-backed migration target

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::Mutex;

/// One DuckDB connection, shared behind a mutex.
///
/// DuckDB calls are synchronous; the async methods run them inline on the
/// caller's task.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Open a private in-memory database
    pub fn in_memory() -> DbResult<Self> {
        Self::wrap(Connection::open_in_memory(), ":memory:")
    }

    /// Open the database file at `path`, creating it if missing
    pub fn from_path(path: &Path) -> DbResult<Self> {
        Self::wrap(Connection::open(path), &path.display().to_string())
    }

    /// Open an existing database file without write access
    pub fn open_read_only(path: &Path) -> DbResult<Self> {
        let config = duckdb::Config::default()
            .access_mode(duckdb::AccessMode::ReadOnly)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Self::wrap(
            Connection::open_with_flags(path, config),
            &path.display().to_string(),
        )
    }

    /// Open `location`; `:memory:` selects an in-memory database
    pub fn new(location: &str) -> DbResult<Self> {
        match location {
            ":memory:" => Self::in_memory(),
            path => Self::from_path(Path::new(path)),
        }
    }

    fn wrap(opened: duckdb::Result<Connection>, location: &str) -> DbResult<Self> {
        let conn = opened.map_err(|e| DbError::ConnectionError(format!("{location}: {e}")))?;
        log::debug!("Opened DuckDB database {}", location);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> DbResult<T>) -> DbResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        f(&conn)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.with_conn(|conn| {
            conn.execute(sql, [])
                .map_err(|e| DbError::ExecutionError(format!("{e} (statement: {sql})")))
        })
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch(sql)
                .map_err(|e| DbError::ExecutionError(e.to_string()))
        })
    }

    async fn query_optional_string(&self, sql: &str) -> DbResult<Option<String>> {
        self.with_conn(|conn| {
            let first = conn.query_row(sql, [], |row| row.get::<_, Option<String>>(0));
            match first {
                Ok(value) => Ok(value),
                Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(DbError::QueryError(format!("{e} (query: {sql})"))),
            }
        })
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = name.rsplit_once('.').unwrap_or(("main", name));
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) > 0 FROM information_schema.tables \
                 WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get::<_, bool>(0),
            )
            .map_err(|e| DbError::QueryError(e.to_string()))
        })
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
