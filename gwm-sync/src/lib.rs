//! # gwm-sync
//!
//! Workflow matching and the plan / apply sync engine.
//!
//! Call [`pipeline::put`] to sync a whole workspace, or compose
//! [`matcher::matching_workflows`], [`plan::plan`] and [`writer::apply`]
//! directly for a single repository.

pub mod diff;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod plan;
pub mod report;
pub mod writer;

pub use diff::{diff_action, diff_actions, FileDiff};
pub use error::{SyncActionError, SyncError, SyncStage};
pub use matcher::matching_workflows;
pub use pipeline::{list_repos, list_workflows, preview_diffs, put, PutOptions, RepoDiff};
pub use plan::{plan, ActionOutcome, SyncAction};
pub use report::{OutcomeCounts, PutReport, RepoReport};
pub use writer::{apply, Applied};
