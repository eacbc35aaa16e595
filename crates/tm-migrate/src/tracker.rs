//! Reading and writing a target's high-water mark.

use crate::error::{MigrateError, MigrateResult};
use tm_core::config::is_plain_identifier;
use tm_core::Version;
use tm_db::Database;

/// Owns the `last_run_migration` row of a target's state table.
///
/// The table holds a single row. A missing row or a NULL value means the
/// target has never recorded a run.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    table: String,
}

impl ProgressTracker {
    /// Tracker for `table`, which must be a plain (optionally schema-qualified)
    /// identifier.
    pub fn new(table: impl Into<String>) -> MigrateResult<Self> {
        let table = table.into();
        if !is_plain_identifier(&table) {
            return Err(MigrateError::InvalidStateTable(table));
        }
        Ok(Self { table })
    }

    /// State table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Read the last applied version, defaulting to [`Version::EPOCH`].
    pub async fn last_applied(&self, db: &dyn Database) -> MigrateResult<Version> {
        let sql = format!(
            "SELECT CAST(last_run_migration AS VARCHAR) FROM {} LIMIT 1",
            self.table
        );
        let value = db
            .query_optional_string(&sql)
            .await
            .map_err(|e| self.read_error(e.to_string()))?;

        match value.as_deref().map(str::trim) {
            None | Some("") => {
                log::debug!("No last_run_migration in {}, starting from epoch", self.table);
                Ok(Version::EPOCH)
            }
            Some(raw) => Version::parse(raw).map_err(|e| self.read_error(e.to_string())),
        }
    }

    /// Like [`last_applied`](Self::last_applied), but a missing state table
    /// also reads as [`Version::EPOCH`]. Issues no DDL.
    pub async fn peek_last_applied(&self, db: &dyn Database) -> MigrateResult<Version> {
        let exists = db
            .relation_exists(&self.table)
            .await
            .map_err(|e| self.read_error(e.to_string()))?;
        if !exists {
            log::debug!("State table {} not found, starting from epoch", self.table);
            return Ok(Version::EPOCH);
        }
        self.last_applied(db).await
    }

    /// Persist `version` as the new high-water mark.
    ///
    /// Updates the existing row, inserting it if the table is empty.
    pub async fn record_last_applied(
        &self,
        version: Version,
        db: &dyn Database,
    ) -> MigrateResult<()> {
        let persist_error = |source| MigrateError::Persist {
            version: version.to_string(),
            source,
        };

        let updated = db
            .execute(&format!(
                "UPDATE {} SET last_run_migration = '{}'",
                self.table, version
            ))
            .await
            .map_err(persist_error)?;

        if updated == 0 {
            db.execute(&format!(
                "INSERT INTO {} (last_run_migration) VALUES ('{}')",
                self.table, version
            ))
            .await
            .map_err(persist_error)?;
        }

        log::debug!("Recorded last_run_migration = {} in {}", version, self.table);
        Ok(())
    }

    fn read_error(&self, message: String) -> MigrateError {
        MigrateError::StateRead {
            table: self.table.clone(),
            message,
        }
    }
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
