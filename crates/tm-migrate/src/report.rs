//! Run phases, per-target reports, and progress callbacks.

use crate::error::MigrateError;
use std::fmt;
use tm_core::{SelectedScript, Version};

/// Phase of a single target run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Not started
    Idle,
    /// Listing the script directory
    Discovering,
    /// Connecting, reading the high-water mark, selecting scripts
    Filtering,
    /// Applying selected scripts
    Executing,
    /// Writing the high-water mark
    RecordingProgress,
    /// Finished successfully
    Complete,
    /// Stopped on an error
    Failed,
}

impl RunPhase {
    /// Whether the run may move from `self` to `next`.
    pub fn can_transition_to(self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Idle, Discovering)
                | (Discovering, Filtering)
                | (Filtering, Executing)
                | (Filtering, Complete)
                | (Executing, RecordingProgress)
                | (RecordingProgress, Complete)
                | (Discovering | Filtering | Executing | RecordingProgress, Failed)
        )
    }

    /// Complete or Failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Complete | RunPhase::Failed)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunPhase::Idle => "idle",
            RunPhase::Discovering => "discovering",
            RunPhase::Filtering => "filtering",
            RunPhase::Executing => "executing",
            RunPhase::RecordingProgress => "recording progress",
            RunPhase::Complete => "complete",
            RunPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of one target run.
#[derive(Debug)]
pub struct RunReport {
    /// Target name
    pub target: String,

    /// Final phase (Complete or Failed)
    pub phase: RunPhase,

    /// Phase in which the run failed
    pub failed_in: Option<RunPhase>,

    /// High-water mark read at the start of the run
    pub previous_version: Option<Version>,

    /// Scripts selected for this run, in apply order
    pub selected: Vec<String>,

    /// Scripts that applied successfully
    pub applied: Vec<String>,

    /// Last high-water mark written during this run
    pub recorded_version: Option<Version>,

    /// Error that stopped the run
    pub error: Option<MigrateError>,
}

impl RunReport {
    pub(crate) fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            phase: RunPhase::Idle,
            failed_in: None,
            previous_version: None,
            selected: Vec::new(),
            applied: Vec::new(),
            recorded_version: None,
            error: None,
        }
    }

    /// Whether the run completed without error.
    pub fn is_success(&self) -> bool {
        self.phase == RunPhase::Complete
    }

    /// Scripts that were selected but not applied.
    pub fn pending(&self) -> &[String] {
        &self.selected[self.applied.len()..]
    }
}

/// Receives progress events from the orchestrator.
///
/// All methods default to doing nothing.
pub trait Reporter {
    /// A target run is starting.
    fn target_started(&mut self, _target: &str) {}

    /// A script was selected for this run.
    fn script_selected(&mut self, _target: &str, _script: &SelectedScript) {}

    /// A script applied successfully.
    fn script_applied(&mut self, _target: &str, _script: &SelectedScript) {}

    /// A target run reached Complete or Failed.
    fn target_finished(&mut self, _report: &RunReport) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}
