//! Error types for gwm-sync.

use std::fmt;
use std::path::PathBuf;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use gwm_core::{ManifestError, WorkspaceError};

/// Fatal errors: any of these stops a run before a single file is written.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The manifest could not be loaded.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// The workspace could not be scanned.
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// The in-repository target directory would escape the repository.
    #[error("invalid target directory '{path}': must be relative and must not contain '..'")]
    InvalidTargetDir { path: PathBuf },
}

/// The step of a file sync that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStage {
    ReadSource,
    ReadTarget,
    CreateDirectory,
    Write,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::ReadSource => write!(f, "read source"),
            SyncStage::ReadTarget => write!(f, "read target"),
            SyncStage::CreateDirectory => write!(f, "create directory"),
            SyncStage::Write => write!(f, "write"),
        }
    }
}

/// A per-file failure. Recoverable: recorded, and the run moves on.
#[derive(Debug, Error)]
#[error("failed to {stage} {path}: {source}")]
pub struct SyncActionError {
    pub stage: SyncStage,
    /// Path the failing filesystem call was made on.
    pub path: PathBuf,
    /// Target file of the action that failed.
    pub target: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl SyncActionError {
    pub(crate) fn new(
        stage: SyncStage,
        path: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self {
            stage,
            path: path.into(),
            target: target.into(),
            source,
        }
    }
}

impl Serialize for SyncActionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SyncActionError", 4)?;
        s.serialize_field("stage", &self.stage)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("target", &self.target)?;
        s.serialize_field("message", &self.source.to_string())?;
        s.end()
    }
}
