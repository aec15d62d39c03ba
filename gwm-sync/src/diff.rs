//! Unified diff preview for `gwm diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use similar::TextDiff;

use crate::error::{SyncActionError, SyncStage};
use crate::plan::{ActionOutcome, SyncAction};

/// A single file diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    pub target: PathBuf,
    pub outcome: ActionOutcome,
    pub unified_diff: String,
}

/// Diff every action that would write, comparing the current target content
/// (empty when absent) with the source. Headers are `a/<rel>` / `b/<rel>`,
/// relative to `root`.
///
/// Stops at the first unreadable file; see [`diff_action`] to keep going.
/// No files are written.
pub fn diff_actions(root: &Path, actions: &[SyncAction]) -> Result<Vec<FileDiff>, SyncActionError> {
    actions
        .iter()
        .filter(|a| a.outcome.needs_write())
        .map(|a| diff_action(root, a))
        .collect()
}

/// Diff a single action against its current target.
pub fn diff_action(root: &Path, action: &SyncAction) -> Result<FileDiff, SyncActionError> {
    let wanted = std::fs::read(&action.source).map_err(|e| {
        SyncActionError::new(SyncStage::ReadSource, &action.source, &action.target, e)
    })?;
    let existing = read_existing_or_empty(&action.target)?;

    let relative = action.target.strip_prefix(root).unwrap_or(&action.target);
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());

    let unified_diff = match (std::str::from_utf8(&existing), std::str::from_utf8(&wanted)) {
        (Ok(old), Ok(new)) => TextDiff::from_lines(old, new)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string(),
        _ => format!("Binary files {old_header} and {new_header} differ\n"),
    };

    Ok(FileDiff {
        target: action.target.clone(),
        outcome: action.outcome,
        unified_diff,
    })
}

fn read_existing_or_empty(path: &Path) -> Result<Vec<u8>, SyncActionError> {
    match std::fs::read(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(SyncActionError::new(SyncStage::ReadTarget, path, path, err)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use gwm_core::WorkflowName;
    use tempfile::TempDir;

    use super::*;

    fn action(source: PathBuf, target: PathBuf, outcome: ActionOutcome) -> SyncAction {
        SyncAction {
            workflow: WorkflowName::from("wf"),
            source,
            target,
            outcome,
        }
    }

    #[test]
    fn local_edit_produces_unified_diff() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.yml");
        fs::write(&src, "name: ci\non: push\n").unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(repo.join(".github")).unwrap();
        let target = repo.join(".github").join("ci.yml");
        fs::write(&target, "name: ci\non: pull_request\n").unwrap();

        let diffs = diff_actions(&repo, &[action(src, target, ActionOutcome::WouldUpdate)]).unwrap();
        assert_eq!(diffs.len(), 1);
        let text = &diffs[0].unified_diff;
        assert!(text.contains("--- a/.github/ci.yml"), "got: {text}");
        assert!(text.contains("+++ b/.github/ci.yml"));
        assert!(text.contains("-on: pull_request"));
        assert!(text.contains("+on: push"));
        assert!(text.contains("@@"));
    }

    #[test]
    fn created_file_diffs_against_empty() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.yml");
        fs::write(&src, "on: push\n").unwrap();
        let target = tmp.path().join("repo").join("ci.yml");

        let diffs =
            diff_actions(&tmp.path().join("repo"), &[action(src, target, ActionOutcome::WouldCreate)])
                .unwrap();
        assert!(diffs[0].unified_diff.contains("+on: push"));
    }

    #[test]
    fn unchanged_files_are_not_diffed() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.yml");
        fs::write(&src, "x").unwrap();
        let diffs = diff_actions(
            tmp.path(),
            &[action(src.clone(), src, ActionOutcome::WouldSkipUnchanged)],
        )
        .unwrap();
        assert!(diffs.is_empty());
    }

    #[test]
    fn missing_source_is_reported_for_that_action() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("gone.yml");
        let target = tmp.path().join("repo").join("ci.yml");

        let err = diff_action(tmp.path(), &action(gone, target.clone(), ActionOutcome::WouldCreate))
            .unwrap_err();
        assert_eq!(err.stage, SyncStage::ReadSource);
        assert_eq!(err.target, target);
    }

    #[test]
    fn binary_content_is_summarized() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("logo.png");
        fs::write(&src, [0x89u8, 0x50, 0xff, 0xfe]).unwrap();
        let target = tmp.path().join("repo").join("logo.png");

        let diffs =
            diff_actions(&tmp.path().join("repo"), &[action(src, target, ActionOutcome::WouldCreate)])
                .unwrap();
        assert_eq!(diffs[0].unified_diff, "Binary files a/logo.png and b/logo.png differ\n");
    }
}
