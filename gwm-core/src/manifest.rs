//! Workflow manifest loading.
//!
//! # Format
//!
//! ```toml
//! [python_black]
//! file = "black.yml"
//! language = "python"
//!
//! [git_fixup]                      # no `language`: applies everywhere
//! file = ["git.yml", "git-problem-matcher.json"]
//! ```
//!
//! Section names are workflow identifiers; TOML forbids duplicate tables, so
//! identifiers are unique by construction. `file` and `language` accept a
//! string or a list of strings and are normalized to lists here, at the
//! parsing boundary. File paths are relative to the manifest's directory and
//! double as the path inside each target repository.

use std::collections::{BTreeSet, HashMap};
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::ManifestError;
use crate::types::{Language, WorkflowDefinition, WorkflowFile, WorkflowName};

/// Language tag that spells out "no restriction".
const WILDCARD_LANGUAGE: &str = "*";

// ---------------------------------------------------------------------------
// Raw (on-disk) shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWorkflow {
    file: Option<OneOrMany>,
    language: Option<OneOrMany>,
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// A validated manifest: workflows in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    path: PathBuf,
    base_dir: PathBuf,
    workflows: Vec<WorkflowDefinition>,
}

impl Manifest {
    /// Absolute path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory that relative `file` entries were resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Workflows in the order the manifest declares them.
    pub fn workflows(&self) -> &[WorkflowDefinition] {
        &self.workflows
    }

    pub fn get(&self, name: &str) -> Option<&WorkflowDefinition> {
        self.workflows.iter().find(|wf| wf.name.0 == name)
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load and validate the manifest at `path`.
///
/// Fails with [`ManifestError`] if the file cannot be read, is not valid
/// TOML, a section is malformed or lacks `file`, a referenced file does not
/// exist, or two entries target the same path. Only reads the filesystem.
pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
    let read_err = |source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    };
    let contents = std::fs::read_to_string(path).map_err(read_err)?;
    let path = std::fs::canonicalize(path).map_err(read_err)?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));

    let table: toml::Table = toml::from_str(&contents).map_err(|source| ManifestError::Parse {
        path: path.clone(),
        source,
    })?;

    let mut workflows = Vec::with_capacity(table.len());
    let mut targets: HashMap<PathBuf, WorkflowName> = HashMap::new();

    for (name, value) in table {
        let name = WorkflowName::from(name);
        let raw: RawWorkflow = value
            .try_into()
            .map_err(|source| ManifestError::InvalidWorkflow {
                workflow: name.clone(),
                path: path.clone(),
                source,
            })?;

        let files = resolve_files(&name, &base_dir, raw.file)?;
        for file in &files {
            if let Some(first) = targets.insert(file.relative.clone(), name.clone()) {
                return Err(ManifestError::ConflictingTarget {
                    first,
                    second: name,
                    target: file.relative.clone(),
                });
            }
        }

        workflows.push(WorkflowDefinition {
            name,
            files,
            languages: normalize_languages(raw.language),
        });
    }

    Ok(Manifest {
        path,
        base_dir,
        workflows,
    })
}

fn resolve_files(
    workflow: &WorkflowName,
    base_dir: &Path,
    raw: Option<OneOrMany>,
) -> Result<Vec<WorkflowFile>, ManifestError> {
    let entries = raw.map(OneOrMany::into_vec).unwrap_or_default();
    if entries.is_empty() {
        return Err(ManifestError::NoFiles {
            workflow: workflow.clone(),
        });
    }

    entries
        .into_iter()
        .map(|entry| {
            let relative = relative_target(&entry).ok_or_else(|| {
                ManifestError::InvalidFilePath {
                    workflow: workflow.clone(),
                    path: PathBuf::from(&entry),
                }
            })?;
            let source = base_dir.join(&relative);
            if !source.is_file() {
                return Err(ManifestError::FileNotFound {
                    workflow: workflow.clone(),
                    path: source,
                });
            }
            Ok(WorkflowFile { source, relative })
        })
        .collect()
}

/// Normalize a `file` entry into a clean relative path.
///
/// Returns `None` for absolute paths, paths with `..`, and empty paths: the
/// target of such an entry would not stay inside the repository.
fn relative_target(entry: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(entry).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

fn normalize_languages(raw: Option<OneOrMany>) -> BTreeSet<Language> {
    let tags: Vec<String> = raw.map(OneOrMany::into_vec).unwrap_or_default();
    if tags.iter().any(|t| t.trim() == WILDCARD_LANGUAGE) {
        return BTreeSet::new();
    }
    tags.iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| Language::new(t))
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
