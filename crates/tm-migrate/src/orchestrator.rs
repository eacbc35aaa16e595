//! Per-target migration runs.
//!
//! A run walks `Idle → Discovering → Filtering → Executing →
//! RecordingProgress → Complete`, dropping to `Failed` on the first error.
//! An empty selection goes straight from `Filtering` to `Complete`. A dry run
//! opens the target read-only and also stops after `Filtering`.

use crate::error::{MigrateError, MigrateResult};
use crate::executor::{apply_script, apply_scripts};
use crate::report::{Reporter, RunPhase, RunReport};
use crate::target::Target;
use crate::tracker::ProgressTracker;
use std::path::Path;
use tm_core::{
    select, CommitMode, Config, MigrationScript, ScriptRepository, SelectedScript, Version,
};
use tm_db::{Database, DbError};

/// Knobs for a migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// When the high-water mark is written
    pub commit_mode: CommitMode,

    /// Stop after selection; never execute or write
    pub dry_run: bool,
}

/// Runs migrations for one target at a time.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    repository: ScriptRepository,
    tracker: ProgressTracker,
    options: RunOptions,
}

impl Orchestrator {
    /// Compose an orchestrator from its parts.
    pub fn new(
        repository: ScriptRepository,
        tracker: ProgressTracker,
        options: RunOptions,
    ) -> Self {
        Self {
            repository,
            tracker,
            options,
        }
    }

    /// Build from project configuration, resolving the script directory
    /// against `root`.
    pub fn from_config(config: &Config, root: &Path) -> MigrateResult<Self> {
        let repository = ScriptRepository::new(config.scripts_path_absolute(root));
        let tracker = ProgressTracker::new(&config.state_table)?;
        let options = RunOptions {
            commit_mode: config.commit_mode,
            dry_run: false,
        };
        Ok(Self::new(repository, tracker, options))
    }

    /// Replace the run options.
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Current run options.
    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Run every target in order.
    ///
    /// A failed target does not stop the ones after it.
    pub async fn run_all(
        &self,
        targets: &[Target],
        reporter: &mut dyn Reporter,
    ) -> Vec<RunReport> {
        let mut reports = Vec::with_capacity(targets.len());
        for target in targets {
            reports.push(self.run_target(target, reporter).await);
        }
        reports
    }

    /// Run migrations for a single target.
    pub async fn run_target(&self, target: &Target, reporter: &mut dyn Reporter) -> RunReport {
        log::info!(
            "Running migrations for {} ({})",
            target.name(),
            target.provider().describe()
        );
        reporter.target_started(target.name());

        let mut run = Run::new(target.name());
        match self.drive(target, &mut run, reporter).await {
            Ok(()) => run.advance(RunPhase::Complete),
            Err(e) => run.fail(e),
        }

        let report = run.report;
        match &report.error {
            None => log::info!(
                "Target {} complete: {} script(s) applied",
                report.target,
                report.applied.len()
            ),
            Some(e) => log::warn!(
                "Target {} failed while {}: {}",
                report.target,
                report.failed_in.unwrap_or(RunPhase::Failed),
                e
            ),
        }
        reporter.target_finished(&report);
        report
    }

    async fn drive(
        &self,
        target: &Target,
        run: &mut Run,
        reporter: &mut dyn Reporter,
    ) -> MigrateResult<()> {
        run.advance(RunPhase::Discovering);
        let scripts = self.repository.discover()?;

        run.advance(RunPhase::Filtering);
        if self.options.dry_run {
            let last_applied = self.peek_last_applied(target).await?;
            let selected = self.select_for(target, &scripts, last_applied, run, reporter)?;
            log::debug!(
                "Dry run: {} script(s) pending for {}",
                selected.len(),
                target.name()
            );
            return Ok(());
        }

        let db = target
            .provider()
            .connect()
            .await
            .map_err(|source| connection_error(target, source))?;
        let last_applied = self.tracker.last_applied(db.as_ref()).await?;
        let selected = self.select_for(target, &scripts, last_applied, run, reporter)?;
        if selected.is_empty() {
            log::debug!("{} is up to date at {}", target.name(), last_applied);
            return Ok(());
        }

        run.advance(RunPhase::Executing);
        match self.options.commit_mode {
            CommitMode::Batch => {
                let mut on_applied = |script: &SelectedScript| {
                    run.report.applied.push(script.name().to_string());
                    reporter.script_applied(target.name(), script);
                };
                apply_scripts(&selected, db.as_ref(), &mut on_applied).await?;
            }
            CommitMode::PerScript => {
                for (i, script) in selected.iter().enumerate() {
                    self.apply_one(target, script, db.as_ref(), run, reporter)
                        .await?;
                    // The last version is written in RecordingProgress
                    if i + 1 < selected.len() {
                        self.record(script, db.as_ref(), run).await?;
                    }
                }
            }
        }

        run.advance(RunPhase::RecordingProgress);
        if let Some(last) = selected.last() {
            self.record(last, db.as_ref(), run).await?;
        }
        Ok(())
    }

    /// Read the high-water mark without creating or provisioning the target.
    async fn peek_last_applied(&self, target: &Target) -> MigrateResult<Version> {
        let db = target
            .provider()
            .connect_read_only()
            .await
            .map_err(|source| connection_error(target, source))?;
        match db {
            Some(db) => self.tracker.peek_last_applied(db.as_ref()).await,
            None => Ok(Version::EPOCH),
        }
    }

    fn select_for(
        &self,
        target: &Target,
        scripts: &[MigrationScript],
        last_applied: Version,
        run: &mut Run,
        reporter: &mut dyn Reporter,
    ) -> MigrateResult<Vec<SelectedScript>> {
        run.report.previous_version = Some(last_applied);
        let selected = select(scripts, last_applied)?;
        for script in &selected {
            reporter.script_selected(target.name(), script);
            run.report.selected.push(script.name().to_string());
        }
        Ok(selected)
    }

    async fn apply_one(
        &self,
        target: &Target,
        script: &SelectedScript,
        db: &dyn Database,
        run: &mut Run,
        reporter: &mut dyn Reporter,
    ) -> MigrateResult<()> {
        apply_script(script, db).await?;
        run.report.applied.push(script.name().to_string());
        reporter.script_applied(target.name(), script);
        Ok(())
    }

    async fn record(
        &self,
        script: &SelectedScript,
        db: &dyn Database,
        run: &mut Run,
    ) -> MigrateResult<()> {
        self.tracker.record_last_applied(script.version, db).await?;
        run.report.recorded_version = Some(script.version);
        Ok(())
    }
}

fn connection_error(target: &Target, source: DbError) -> MigrateError {
    MigrateError::Connection {
        target: target.name().to_string(),
        source,
    }
}

/// Phase bookkeeping for one in-flight run.
struct Run {
    report: RunReport,
}

impl Run {
    fn new(target: &str) -> Self {
        Self {
            report: RunReport::new(target),
        }
    }

    fn advance(&mut self, next: RunPhase) {
        debug_assert!(
            self.report.phase.can_transition_to(next),
            "invalid run transition {} -> {}",
            self.report.phase,
            next
        );
        log::debug!("{}: {} -> {}", self.report.target, self.report.phase, next);
        self.report.phase = next;
    }

    fn fail(&mut self, error: MigrateError) {
        self.report.failed_in = Some(self.report.phase);
        self.advance(RunPhase::Failed);
        self.report.error = Some(error);
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
