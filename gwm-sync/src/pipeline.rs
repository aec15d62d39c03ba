//! Operations exposed to the CLI: `list_workflows`, `list_repos`, `put`, and
//! the `diff` preview.
//!
//! Fatal errors (manifest, workspace, target directory) are raised before any
//! repository is touched. Per-file failures inside `put` accumulate in the
//! returned [`PutReport`] instead.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use gwm_core::{manifest, Manifest, RepositoryProfile};
use gwm_detector::{workspace, LanguageDetector};

use crate::diff::{diff_action, FileDiff};
use crate::error::SyncActionError;
use crate::matcher::matching_workflows;
use crate::plan::plan;
use crate::report::{PutReport, RepoReport};
use crate::writer::apply;
use crate::SyncError;

/// Knobs for a `put` run. Passed explicitly; nothing is read from globals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Plan and report, but never write.
    pub dry_run: bool,
    /// Log every action at `info` instead of `debug`.
    pub verbose: bool,
    /// Directory inside each repository that receives the files.
    /// Empty or `.` means the repository root.
    pub target_dir: PathBuf,
}

/// Diff preview for one repository.
#[derive(Debug, serde::Serialize)]
pub struct RepoDiff {
    pub name: String,
    pub diffs: Vec<FileDiff>,
    /// Files that could not be read; the other diffs are still produced.
    pub failures: Vec<SyncActionError>,
}

/// Load the manifest for listing.
pub fn list_workflows(manifest_path: &Path) -> Result<Manifest, SyncError> {
    Ok(manifest::load(manifest_path)?)
}

/// Scan the workspace for listing.
pub fn list_repos(
    workspace_root: &Path,
    ignore: &BTreeSet<String>,
) -> Result<Vec<RepositoryProfile>, SyncError> {
    Ok(workspace::scan(workspace_root, ignore)?)
}

/// Copy every applicable workflow file into every repository of the workspace.
///
/// Loads the manifest and scans the workspace first; either failing aborts
/// the run with nothing written. Then each repository is matched, planned,
/// and (unless `dry_run`) applied independently.
pub fn put(
    manifest_path: &Path,
    workspace_root: &Path,
    ignore: &BTreeSet<String>,
    options: &PutOptions,
) -> Result<PutReport, SyncError> {
    check_target_dir(&options.target_dir)?;
    let manifest = manifest::load(manifest_path)?;
    let repos = scan_for(&manifest, workspace_root, ignore, &options.target_dir)?;
    Ok(sync_repositories(&manifest, &repos, options))
}

/// Run match → plan → apply for already-loaded inputs.
pub fn sync_repositories(
    manifest: &Manifest,
    repos: &[RepositoryProfile],
    options: &PutOptions,
) -> PutReport {
    if options.dry_run {
        tracing::info!("[dry-run] not writing any files");
    }
    PutReport {
        dry_run: options.dry_run,
        repositories: repos
            .iter()
            .map(|repo| sync_repository(manifest, repo, options))
            .collect(),
    }
}

/// Run match → plan → apply for one repository.
pub fn sync_repository(
    manifest: &Manifest,
    repo: &RepositoryProfile,
    options: &PutOptions,
) -> RepoReport {
    let workflows = matching_workflows(manifest, repo);
    let root = install_root(&repo.path, &options.target_dir);
    let planned = plan(&root, &workflows);

    let level = if options.verbose {
        tracing::Level::Info
    } else {
        tracing::Level::Debug
    };
    let prefix = if options.dry_run { "[dry-run] " } else { "" };
    for action in &planned {
        tracing::log!(
            level,
            "{prefix}{}: {} -> {}",
            action.outcome,
            action.source.display(),
            action.target.display()
        );
    }

    let (actions, failures) = if options.dry_run {
        (planned, Vec::new())
    } else {
        let applied = apply(planned);
        (applied.actions, applied.failures)
    };

    RepoReport {
        name: repo.name.clone(),
        path: repo.path.clone(),
        languages: repo.languages.clone(),
        workflows: workflows.iter().map(|wf| wf.name.clone()).collect(),
        actions,
        failures,
    }
}

/// Unified diffs of what `put` would change, per repository. Writes nothing.
///
/// Repositories without changes are omitted. An unreadable file is recorded
/// in [`RepoDiff::failures`] and the preview moves on, as `put` does.
pub fn preview_diffs(
    manifest_path: &Path,
    workspace_root: &Path,
    ignore: &BTreeSet<String>,
    target_dir: &Path,
) -> Result<Vec<RepoDiff>, SyncError> {
    check_target_dir(target_dir)?;
    let manifest = manifest::load(manifest_path)?;
    let repos = scan_for(&manifest, workspace_root, ignore, target_dir)?;

    let mut out = Vec::new();
    for repo in &repos {
        let workflows = matching_workflows(&manifest, repo);
        let root = install_root(&repo.path, target_dir);
        let mut diffs = Vec::new();
        let mut failures = Vec::new();
        for action in plan(&root, &workflows)
            .iter()
            .filter(|a| a.outcome.needs_write())
        {
            match diff_action(&repo.path, action) {
                Ok(diff) => diffs.push(diff),
                Err(err) => {
                    tracing::warn!("{err}");
                    failures.push(err);
                }
            }
        }
        if !diffs.is_empty() || !failures.is_empty() {
            out.push(RepoDiff {
                name: repo.name.clone(),
                diffs,
                failures,
            });
        }
    }
    Ok(out)
}

/// `<repo>/<target_dir>`, or the repository root itself for `""` / `"."`.
pub fn install_root(repo: &Path, target_dir: &Path) -> PathBuf {
    let mut root = repo.to_path_buf();
    for component in target_dir.components() {
        if let Component::Normal(part) = component {
            root.push(part);
        }
    }
    root
}

/// Repository-relative paths of every file the manifest installs.
pub fn installed_paths(manifest: &Manifest, target_dir: &Path) -> BTreeSet<PathBuf> {
    let base = install_root(Path::new(""), target_dir);
    manifest
        .workflows()
        .iter()
        .flat_map(|wf| wf.files.iter())
        .map(|file| base.join(&file.relative))
        .collect()
}

/// Scan with installed files excluded from detection, so a second run sees
/// the same languages as the first.
fn scan_for(
    manifest: &Manifest,
    workspace_root: &Path,
    ignore: &BTreeSet<String>,
    target_dir: &Path,
) -> Result<Vec<RepositoryProfile>, SyncError> {
    let mut detector = LanguageDetector::with_default_rules();
    detector.exclude_paths(installed_paths(manifest, target_dir));
    Ok(workspace::scan_with(&detector, workspace_root, ignore)?)
}

fn check_target_dir(target_dir: &Path) -> Result<(), SyncError> {
    let escapes = target_dir.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(SyncError::InvalidTargetDir {
            path: target_dir.to_path_buf(),
        });
    }
    Ok(())
}
