//! Error types for gwm-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::WorkflowName;

/// All errors that can arise while loading a workflow manifest.
///
/// Every variant is fatal: a manifest that fails to load is never partially
/// interpreted.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read (missing, permission denied, ...).
    #[error("failed to read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax error, with file path and line context from `toml`.
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A section has the wrong shape (not a table, wrong value types, unknown keys).
    #[error("invalid workflow '{workflow}' in {path}: {source}")]
    InvalidWorkflow {
        workflow: WorkflowName,
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A section has no `file` key, or an empty list of files.
    #[error("workflow '{workflow}' does not declare any `file`")]
    NoFiles { workflow: WorkflowName },

    /// A `file` entry does not point at an existing regular file.
    #[error("workflow '{workflow}' references missing file {path}")]
    FileNotFound { workflow: WorkflowName, path: PathBuf },

    /// A `file` entry is absolute or climbs out of the manifest directory.
    #[error("workflow '{workflow}' has invalid file path '{path}': must be relative and must not contain '..'")]
    InvalidFilePath { workflow: WorkflowName, path: PathBuf },

    /// Two file entries would be written to the same target inside a repository.
    #[error("workflows '{first}' and '{second}' both install '{target}'")]
    ConflictingTarget {
        first: WorkflowName,
        second: WorkflowName,
        target: PathBuf,
    },
}

/// Errors raised while enumerating the repositories of a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace not found at {path}")]
    NotFound { path: PathBuf },

    #[error("workspace root {path} is not a directory")]
    NotADirectory { path: PathBuf },

    /// The workspace root exists but could not be listed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
