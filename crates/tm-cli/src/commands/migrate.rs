//! Migrate command implementation

use anyhow::{Context, Result};
use tm_core::{CommitMode, SelectedScript};
use tm_migrate::{Orchestrator, Reporter, RunOptions, RunReport};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{load_config, resolve_targets};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let targets = resolve_targets(&config, global, &args.target)?;

    let commit_mode = if args.per_script_commit {
        CommitMode::PerScript
    } else {
        config.commit_mode
    };
    let orchestrator = Orchestrator::from_config(&config, &global.project_dir)
        .context("Failed to set up migration runner")?
        .with_options(RunOptions {
            commit_mode,
            dry_run: args.dry_run,
        });

    if global.verbose {
        eprintln!(
            "[verbose] Scripts: {}, state table: {}, commit mode: {}",
            config.scripts_path_absolute(&global.project_dir).display(),
            config.state_table,
            commit_mode
        );
    }

    let mut reporter = ConsoleReporter {
        verbose: global.verbose,
    };
    let reports = orchestrator.run_all(&targets, &mut reporter).await;

    let failed: Vec<&str> = reports
        .iter()
        .filter(|r| !r.is_success())
        .map(|r| r.target.as_str())
        .collect();
    if !failed.is_empty() {
        anyhow::bail!(
            "Migrations failed for {} of {} target(s): {}",
            failed.len(),
            reports.len(),
            failed.join(", ")
        );
    }

    if args.dry_run {
        println!("Dry run finished - no scripts were executed.");
    } else {
        println!("Process finished successfully.");
    }
    Ok(())
}

/// Prints run progress the way an operator watches it.
struct ConsoleReporter {
    verbose: bool,
}

impl Reporter for ConsoleReporter {
    fn target_started(&mut self, target: &str) {
        println!("Running migrations for {}...", target);
    }

    fn script_selected(&mut self, _target: &str, script: &SelectedScript) {
        println!("{}", script.name());
    }

    fn script_applied(&mut self, _target: &str, script: &SelectedScript) {
        if self.verbose {
            eprintln!("[verbose] Applied {}", script.name());
        }
    }

    fn target_finished(&mut self, report: &RunReport) {
        if !report.is_success() {
            eprintln!("  ✗ {}: {}", report.target, failure_message(report));
        } else if self.verbose {
            eprintln!(
                "[verbose] {}: {} script(s) applied",
                report.target,
                report.applied.len()
            );
        }
    }
}

fn failure_message(report: &RunReport) -> String {
    let phase = report
        .failed_in
        .map(|p| p.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    match &report.error {
        Some(e) => format!("failed while {}: {}", phase, e),
        None => format!("failed while {}", phase),
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
