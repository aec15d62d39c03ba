//! Sync planning: classify every applicable file without touching disk.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use gwm_core::{WorkflowDefinition, WorkflowName};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What happens (or happened) to one target file.
///
/// `Would*` variants come out of [`plan`]; [`crate::writer::apply`] turns
/// them into their past-tense form once the file is in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionOutcome {
    WouldCreate,
    WouldUpdate,
    WouldSkipUnchanged,
    Created,
    Updated,
    SkippedUnchanged,
}

impl ActionOutcome {
    /// `true` for the planned (`Would*`) forms.
    pub fn is_planned(self) -> bool {
        matches!(
            self,
            ActionOutcome::WouldCreate | ActionOutcome::WouldUpdate | ActionOutcome::WouldSkipUnchanged
        )
    }

    /// `true` when applying the action writes the target.
    pub fn needs_write(self) -> bool {
        matches!(self, ActionOutcome::WouldCreate | ActionOutcome::WouldUpdate)
    }

    /// Past-tense form of a planned outcome; completed outcomes map to themselves.
    pub fn completed(self) -> Self {
        match self {
            ActionOutcome::WouldCreate => ActionOutcome::Created,
            ActionOutcome::WouldUpdate => ActionOutcome::Updated,
            ActionOutcome::WouldSkipUnchanged => ActionOutcome::SkippedUnchanged,
            done => done,
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionOutcome::WouldCreate => "would-create",
            ActionOutcome::WouldUpdate => "would-update",
            ActionOutcome::WouldSkipUnchanged => "would-skip-unchanged",
            ActionOutcome::Created => "created",
            ActionOutcome::Updated => "updated",
            ActionOutcome::SkippedUnchanged => "skipped-unchanged",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// One file copy, planned or executed. Built fresh on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncAction {
    pub workflow: WorkflowName,
    pub source: PathBuf,
    pub target: PathBuf,
    pub outcome: ActionOutcome,
}

// ---------------------------------------------------------------------------
// plan
// ---------------------------------------------------------------------------

/// Plan the copy of every file of every workflow into `root`.
///
/// The target of each file is `root` joined with the file's manifest-relative
/// path. Classification compares bytes: absent target → create, different →
/// update, identical → skip. Pure: reads only, so the same plan serves dry
/// runs and real runs.
///
/// A target or source that cannot be read is classified as an update; the
/// write in [`crate::writer::apply`] then reports the real failure.
pub fn plan(root: &Path, workflows: &[&WorkflowDefinition]) -> Vec<SyncAction> {
    let mut actions = Vec::new();
    for workflow in workflows {
        for file in &workflow.files {
            let target = root.join(&file.relative);
            let outcome = classify(&file.source, &target);
            tracing::debug!("{outcome}: {}", target.display());
            actions.push(SyncAction {
                workflow: workflow.name.clone(),
                source: file.source.clone(),
                target,
                outcome,
            });
        }
    }
    actions
}

fn classify(source: &Path, target: &Path) -> ActionOutcome {
    let target_meta = match fs::metadata(target) {
        Ok(meta) => meta,
        Err(err) if err.kind() == ErrorKind::NotFound => return ActionOutcome::WouldCreate,
        Err(err) => {
            tracing::warn!("cannot stat {}: {err}", target.display());
            return ActionOutcome::WouldUpdate;
        }
    };
    if !target_meta.is_file() {
        return ActionOutcome::WouldUpdate;
    }
    if let Ok(source_meta) = fs::metadata(source) {
        if source_meta.len() != target_meta.len() {
            return ActionOutcome::WouldUpdate;
        }
    }

    match (fs::read(source), fs::read(target)) {
        (Ok(wanted), Ok(existing)) if wanted == existing => ActionOutcome::WouldSkipUnchanged,
        (Ok(_), Ok(_)) => ActionOutcome::WouldUpdate,
        (Err(err), _) => {
            tracing::warn!("cannot read source {}: {err}", source.display());
            ActionOutcome::WouldUpdate
        }
        (_, Err(err)) => {
            tracing::warn!("cannot read {}: {err}", target.display());
            ActionOutcome::WouldUpdate
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
