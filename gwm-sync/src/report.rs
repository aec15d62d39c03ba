//! Run summaries for `put`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use gwm_core::{Language, WorkflowName};

use crate::error::SyncActionError;
use crate::plan::{ActionOutcome, SyncAction};

/// Per-outcome tallies. Planned and completed forms share a bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl OutcomeCounts {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged + self.failed
    }

    fn add(&mut self, other: OutcomeCounts) {
        self.created += other.created;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.failed += other.failed;
    }
}

/// Everything `put` did (or would do) to one repository.
#[derive(Debug, Serialize)]
pub struct RepoReport {
    pub name: String,
    pub path: PathBuf,
    pub languages: BTreeSet<Language>,
    /// Applicable workflows, in manifest order.
    pub workflows: Vec<WorkflowName>,
    pub actions: Vec<SyncAction>,
    pub failures: Vec<SyncActionError>,
}

impl RepoReport {
    /// Tally the actions. After a real run an action still in its planned
    /// form is one whose write failed.
    pub fn counts(&self, dry_run: bool) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for action in &self.actions {
            if !dry_run && action.outcome.is_planned() {
                counts.failed += 1;
                continue;
            }
            match action.outcome {
                ActionOutcome::WouldCreate | ActionOutcome::Created => counts.created += 1,
                ActionOutcome::WouldUpdate | ActionOutcome::Updated => counts.updated += 1,
                ActionOutcome::WouldSkipUnchanged | ActionOutcome::SkippedUnchanged => {
                    counts.unchanged += 1
                }
            }
        }
        counts
    }
}

/// Summary of one `put` invocation across the workspace.
#[derive(Debug, Serialize)]
pub struct PutReport {
    pub dry_run: bool,
    pub repositories: Vec<RepoReport>,
}

impl PutReport {
    pub fn counts(&self) -> OutcomeCounts {
        let mut total = OutcomeCounts::default();
        for repo in &self.repositories {
            total.add(repo.counts(self.dry_run));
        }
        total
    }

    pub fn failures(&self) -> impl Iterator<Item = &SyncActionError> {
        self.repositories.iter().flat_map(|r| r.failures.iter())
    }

    /// `true` if any file failed; the CLI turns this into a non-zero exit.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Pretty-printed JSON document of the whole report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
