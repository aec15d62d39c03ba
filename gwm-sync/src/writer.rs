//! Applying a plan.
//!
//! ## `copy_file` steps
//!
//! 1. Read the source bytes.
//! 2. Create the target's parent directories.
//! 3. Write to `<target>.gwm.tmp`, carrying over the permissions of the
//!    existing target (or of the source for a new file).
//! 4. Rename to the final path (atomic on POSIX); the target is replaced whole.
//!
//! A target that is a symlink is written through: the link stays and the
//! file it points to receives the content.
//!
//! A failure at any step is recorded for that file only; the remaining
//! actions still run.

use std::path::{Path, PathBuf};

use crate::error::{SyncActionError, SyncStage};
use crate::plan::SyncAction;

/// Result of [`apply`].
#[derive(Debug, Default)]
pub struct Applied {
    /// Every input action, in order. Successful ones carry their past-tense
    /// outcome; failed ones keep the planned outcome.
    pub actions: Vec<SyncAction>,
    pub failures: Vec<SyncActionError>,
}

/// Execute `actions`: write every create/update, relabel skips.
///
/// Skip-unchanged actions cause no filesystem access.
pub fn apply(actions: Vec<SyncAction>) -> Applied {
    let mut applied = Applied::default();
    for mut action in actions {
        if action.outcome.needs_write() {
            match copy_file(&action.source, &action.target) {
                Ok(()) => {
                    action.outcome = action.outcome.completed();
                    tracing::info!("{}: {}", action.outcome, action.target.display());
                }
                Err(err) => {
                    tracing::warn!("{err}");
                    applied.failures.push(err);
                }
            }
        } else {
            action.outcome = action.outcome.completed();
        }
        applied.actions.push(action);
    }
    applied
}

pub(crate) fn copy_file(source: &Path, target: &Path) -> Result<(), SyncActionError> {
    let dest = write_destination(target);
    let tmp = PathBuf::from(format!("{}.gwm.tmp", dest.display()));
    copy_file_with_tmp(source, &dest, &tmp).map_err(|mut err| {
        err.target = target.to_path_buf();
        err
    })
}

/// The link's referent for a symlinked target; the target itself otherwise,
/// including dangling links.
fn write_destination(target: &Path) -> PathBuf {
    match std::fs::symlink_metadata(target) {
        Ok(meta) if meta.file_type().is_symlink() => {
            std::fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf())
        }
        _ => target.to_path_buf(),
    }
}

fn copy_file_with_tmp(source: &Path, target: &Path, tmp: &Path) -> Result<(), SyncActionError> {
    // Step 1: read the canonical bytes.
    let bytes = std::fs::read(source)
        .map_err(|e| SyncActionError::new(SyncStage::ReadSource, source, target, e))?;

    // Step 2: ensure parent directories exist.
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| SyncActionError::new(SyncStage::CreateDirectory, parent, target, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent)
            .map_err(|e| SyncActionError::new(SyncStage::CreateDirectory, tmp_parent, target, e))?;
    }

    // Step 3: write the temp file with the mode the target should keep.
    if let Err(e) = std::fs::write(tmp, &bytes) {
        let _ = std::fs::remove_file(tmp);
        return Err(SyncActionError::new(SyncStage::Write, tmp, target, e));
    }
    let mode_from = std::fs::metadata(target).or_else(|_| std::fs::metadata(source));
    if let Ok(meta) = mode_from {
        if let Err(e) = std::fs::set_permissions(tmp, meta.permissions()) {
            let _ = std::fs::remove_file(tmp);
            return Err(SyncActionError::new(SyncStage::Write, tmp, target, e));
        }
    }

    // Step 4: atomic rename to final path.
    if let Err(e) = std::fs::rename(tmp, target) {
        let _ = std::fs::remove_file(tmp);
        return Err(SyncActionError::new(SyncStage::Write, target, target, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ActionOutcome;
    use gwm_core::WorkflowName;
    use std::fs;
    use tempfile::TempDir;

    fn action(source: &Path, target: &Path, outcome: ActionOutcome) -> SyncAction {
        SyncAction {
            workflow: WorkflowName::from("wf"),
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            outcome,
        }
    }

    #[test]
    fn create_writes_file_and_relabels() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.yml");
        fs::write(&src, "on: push\n").unwrap();
        let target = tmp.path().join("repo").join("ci.yml");

        let applied = apply(vec![action(&src, &target, ActionOutcome::WouldCreate)]);
        assert!(applied.failures.is_empty());
        assert_eq!(applied.actions[0].outcome, ActionOutcome::Created);
        assert_eq!(fs::read(&target).unwrap(), b"on: push\n");
    }

    #[test]
    fn update_overwrites_fully() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.yml");
        fs::write(&src, "short").unwrap();
        let target = tmp.path().join("ci.yml");
        fs::write(&target, "a much longer previous content").unwrap();

        let applied = apply(vec![action(&src, &target, ActionOutcome::WouldUpdate)]);
        assert_eq!(applied.actions[0].outcome, ActionOutcome::Updated);
        assert_eq!(fs::read_to_string(&target).unwrap(), "short");
    }

    #[test]
    #[cfg(unix)]
    fn update_keeps_target_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("hook.sh");
        fs::write(&src, "#!/bin/sh\necho new\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o644)).unwrap();
        let target = tmp.path().join("repo").join("hook.sh");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "#!/bin/sh\necho old\n").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();

        let applied = apply(vec![action(&src, &target, ActionOutcome::WouldUpdate)]);
        assert!(applied.failures.is_empty());
        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
        assert_eq!(fs::read_to_string(&target).unwrap(), "#!/bin/sh\necho new\n");
    }

    #[test]
    #[cfg(unix)]
    fn create_takes_source_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("hook.sh");
        fs::write(&src, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();
        let target = tmp.path().join("repo").join("hook.sh");

        apply(vec![action(&src, &target, ActionOutcome::WouldCreate)]);
        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }

    #[test]
    #[cfg(unix)]
    fn symlinked_target_is_written_through() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.yml");
        fs::write(&src, "new").unwrap();
        let shared = tmp.path().join("shared.yml");
        fs::write(&shared, "old").unwrap();
        let target = tmp.path().join("ci.yml");
        std::os::unix::fs::symlink(&shared, &target).unwrap();

        let applied = apply(vec![action(&src, &target, ActionOutcome::WouldUpdate)]);
        assert!(applied.failures.is_empty());
        assert!(fs::symlink_metadata(&target).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&shared).unwrap(), "new");
        assert_eq!(applied.actions[0].target, target);
    }

    #[test]
    fn skip_does_not_touch_filesystem() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("missing-source.yml");
        let target = tmp.path().join("nowhere").join("ci.yml");

        let applied = apply(vec![action(&src, &target, ActionOutcome::WouldSkipUnchanged)]);
        assert!(applied.failures.is_empty());
        assert_eq!(applied.actions[0].outcome, ActionOutcome::SkippedUnchanged);
        assert!(!tmp.path().join("nowhere").exists());
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.yml");
        fs::write(&src, "x").unwrap();
        let target = tmp.path().join(".github").join("workflows").join("ci.yml");
        copy_file(&src, &target).unwrap();
        assert!(target.exists());
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.yml");
        fs::write(&src, "x").unwrap();
        let target = tmp.path().join("ci.yml");
        copy_file(&src, &target).unwrap();
        let tmp_path = PathBuf::from(format!("{}.gwm.tmp", target.display()));
        assert!(!tmp_path.exists(), ".gwm.tmp must be cleaned up");
    }

    #[test]
    fn failure_is_recorded_and_run_continues() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.yml");
        fs::write(&src, "x").unwrap();
        // A regular file where a parent directory is needed.
        fs::write(tmp.path().join("blocker"), "").unwrap();
        let blocked = tmp.path().join("blocker").join("ci.yml");
        let fine = tmp.path().join("ok").join("ci.yml");

        let applied = apply(vec![
            action(&src, &blocked, ActionOutcome::WouldCreate),
            action(&src, &fine, ActionOutcome::WouldCreate),
        ]);

        assert_eq!(applied.failures.len(), 1);
        assert_eq!(applied.failures[0].stage, SyncStage::CreateDirectory);
        assert_eq!(applied.failures[0].target, blocked);
        assert_eq!(applied.actions[0].outcome, ActionOutcome::WouldCreate);
        assert_eq!(applied.actions[1].outcome, ActionOutcome::Created);
        assert!(fine.exists());
    }

    #[test]
    fn missing_source_is_a_read_failure() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("ci.yml");
        let applied = apply(vec![action(
            &tmp.path().join("gone.yml"),
            &target,
            ActionOutcome::WouldCreate,
        )]);
        assert_eq!(applied.failures[0].stage, SyncStage::ReadSource);
        assert!(!target.exists());
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let src = root.path().join("src.yml");
        fs::write(&src, "new content").unwrap();

        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();
        let target = readonly_dir.join("ci.yml");
        fs::write(&target, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join("ci.yml.gwm.tmp");

        let result = copy_file_with_tmp(&src, &target, &tmp_path);

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        // Root ignores directory permissions; only assert when the rename failed.
        if let Err(err) = result {
            assert_eq!(err.stage, SyncStage::Write);
            assert_eq!(fs::read_to_string(&target).unwrap(), "original");
            assert!(!tmp_path.exists(), ".gwm.tmp should be cleaned up");
        }
    }
}
