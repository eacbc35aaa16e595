//! tm-migrate - Migration runner for Tidemark
//!
//! Applies the scripts selected by `tm-core` to each configured target, one
//! target at a time, and records the per-target high-water mark.
//!
//! Runs are strictly sequential. Two runs against the same target at the same
//! time can both read the same `last_run_migration` and apply scripts twice;
//! that is not guarded against.

pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod report;
pub mod target;
pub mod tracker;

pub use error::{MigrateError, MigrateResult};
pub use executor::{apply_script, apply_scripts};
pub use orchestrator::{Orchestrator, RunOptions};
pub use report::{NoopReporter, Reporter, RunPhase, RunReport};
pub use target::{targets_from_config, Target};
pub use tracker::ProgressTracker;
