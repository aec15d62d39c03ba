//! Workspace scanning: one repository per immediate subdirectory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use gwm_core::{RepositoryProfile, WorkspaceError};

use crate::LanguageDetector;

/// Scan `workspace` with the built-in detector.
///
/// See [`scan_with`].
pub fn scan(
    workspace: &Path,
    ignore: &BTreeSet<String>,
) -> Result<Vec<RepositoryProfile>, WorkspaceError> {
    scan_with(&LanguageDetector::default(), workspace, ignore)
}

/// List the repositories of `workspace` and detect the languages of each.
///
/// Every immediate subdirectory whose basename is not in `ignore`
/// (case-sensitive, exact) is one repository. Profiles come back sorted by
/// basename so repeated runs report in the same order.
///
/// Returns [`WorkspaceError`] if `workspace` is missing, is not a directory,
/// or cannot be listed.
pub fn scan_with(
    detector: &LanguageDetector,
    workspace: &Path,
    ignore: &BTreeSet<String>,
) -> Result<Vec<RepositoryProfile>, WorkspaceError> {
    let repos = list_repositories(workspace, ignore)?;
    Ok(repos
        .into_iter()
        .map(|(name, path)| {
            let languages = detector.detect(&path);
            RepositoryProfile {
                name,
                path,
                languages,
            }
        })
        .collect())
}

fn list_repositories(
    workspace: &Path,
    ignore: &BTreeSet<String>,
) -> Result<Vec<(String, PathBuf)>, WorkspaceError> {
    if !workspace.exists() {
        return Err(WorkspaceError::NotFound {
            path: workspace.to_path_buf(),
        });
    }
    if !workspace.is_dir() {
        return Err(WorkspaceError::NotADirectory {
            path: workspace.to_path_buf(),
        });
    }
    let io_err = |source| WorkspaceError::Io {
        path: workspace.to_path_buf(),
        source,
    };
    let root = fs::canonicalize(workspace).map_err(io_err)?;

    let mut repos: Vec<(String, PathBuf)> = fs::read_dir(&root)
        .map_err(io_err)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
        .filter(|(name, _)| {
            let ignored = ignore.contains(name);
            if ignored {
                tracing::debug!("ignoring repository '{name}'");
            }
            !ignored
        })
        .collect();
    repos.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(repos)
}

/// Names of the YAML files (`*.yml`, `*.yaml`) directly inside
/// `<repo>/<target_dir>`, sorted. Empty when the directory does not exist.
pub fn existing_workflow_files(repo: &Path, target_dir: &Path) -> Vec<String> {
    let dir = repo.join(target_dir);
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext == "yml" || ext == "yaml")
                .unwrap_or(false)
        })
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
