//! Status command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use tm_core::Version;
use tm_migrate::{NoopReporter, Orchestrator, RunOptions, RunReport};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{load_config, resolve_targets};

/// Status row for one target
#[derive(Debug, Serialize)]
struct TargetStatus {
    target: String,
    last_applied: Option<String>,
    pending: Vec<String>,
    error: Option<String>,
}

impl From<&RunReport> for TargetStatus {
    fn from(report: &RunReport) -> Self {
        Self {
            target: report.target.clone(),
            last_applied: report
                .previous_version
                .filter(|v| *v != Version::EPOCH)
                .map(|v| v.to_string()),
            pending: report.selected.clone(),
            error: report.error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let targets = resolve_targets(&config, global, &args.target)?;

    let orchestrator = Orchestrator::from_config(&config, &global.project_dir)
        .context("Failed to set up migration runner")?
        .with_options(RunOptions {
            commit_mode: config.commit_mode,
            dry_run: true,
        });

    let reports = orchestrator.run_all(&targets, &mut NoopReporter).await;
    let rows: Vec<TargetStatus> = reports.iter().map(TargetStatus::from).collect();

    match args.output {
        StatusOutput::Json => {
            let json = serde_json::to_string_pretty(&rows)
                .context("Failed to serialize status to JSON")?;
            println!("{}", json);
        }
        StatusOutput::Table => print_table(&rows),
    }

    let errors = rows.iter().filter(|r| r.error.is_some()).count();
    if errors > 0 {
        anyhow::bail!("Could not read status for {} target(s)", errors);
    }
    Ok(())
}

fn print_table(rows: &[TargetStatus]) {
    let target_width = rows
        .iter()
        .map(|r| r.target.len())
        .max()
        .unwrap_or(0)
        .max("TARGET".len());

    println!("{:<target_width$}  {:<14}  PENDING", "TARGET", "LAST APPLIED");
    for row in rows {
        let last = row.last_applied.as_deref().unwrap_or("-");
        let pending = match &row.error {
            Some(e) => format!("error: {}", e),
            None => row.pending.len().to_string(),
        };
        println!("{:<target_width$}  {:<14}  {}", row.target, last, pending);
    }

    for row in rows.iter().filter(|r| !r.pending.is_empty()) {
        println!();
        println!("Pending for {}:", row.target);
        for name in &row.pending {
            println!("  {}", name);
        }
    }
}
