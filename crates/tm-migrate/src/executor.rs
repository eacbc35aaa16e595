//! Script execution against a target connection.

use crate::error::{MigrateError, MigrateResult};
use tm_core::SelectedScript;
use tm_db::Database;

/// Read and execute one script.
///
/// The script is run as a batch in auto-commit mode; no transaction is opened
/// around it. Empty scripts are skipped.
pub async fn apply_script(script: &SelectedScript, db: &dyn Database) -> MigrateResult<()> {
    let sql = script
        .script
        .read_sql()
        .map_err(|e| MigrateError::ScriptRead {
            script: script.name().to_string(),
            source: e,
        })?;

    if sql.trim().is_empty() {
        log::warn!("Script {} is empty, nothing to execute", script.name());
        return Ok(());
    }

    log::debug!("Applying script {}", script.name());
    db.execute_batch(&sql)
        .await
        .map_err(|e| MigrateError::ScriptExecution {
            script: script.name().to_string(),
            source: e,
        })
}

/// Apply `scripts` in order, stopping at the first failure.
///
/// `on_applied` is called after each script succeeds. Returns the name of the
/// last script applied, or `None` for an empty batch.
pub async fn apply_scripts(
    scripts: &[SelectedScript],
    db: &dyn Database,
    on_applied: &mut dyn FnMut(&SelectedScript),
) -> MigrateResult<Option<String>> {
    let mut last = None;
    for script in scripts {
        apply_script(script, db).await?;
        on_applied(script);
        last = Some(script.name().to_string());
    }
    Ok(last)
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
