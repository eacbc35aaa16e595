//! The connection seam between the runner and a target database

use crate::error::DbResult;
use async_trait::async_trait;

/// A live connection to one migration target.
///
/// Statements run in auto-commit mode; no transaction is opened on the
/// caller's behalf.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run one statement and return the number of rows it changed
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Run a whole script of `;`-separated statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// First column of the first row, as text.
    ///
    /// `None` when the query returns no rows or the value is NULL.
    async fn query_optional_string(&self, sql: &str) -> DbResult<Option<String>>;

    /// Whether a table or view named `name` (optionally `schema.name`) exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Short backend name used in log lines
    fn db_type(&self) -> &'static str;
}
