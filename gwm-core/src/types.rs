//! Domain types for gwm.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Types derive `Serialize` so the CLI can emit them as JSON.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed workflow identifier (the manifest section name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkflowName(pub String);

impl fmt::Display for WorkflowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for WorkflowName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkflowName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A programming-language tag such as `python` or `cpp`.
///
/// Tags are normalized on construction: trimmed, lower-cased, and `c++`
/// folded into `cpp`. Two tags are equal iff their normalized text is equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Language(String);

impl Language {
    pub fn new(tag: &str) -> Self {
        let lower = tag.trim().to_ascii_lowercase();
        match lower.as_str() {
            "c++" | "cxx" => Self("cpp".to_string()),
            _ => Self(lower),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

/// One file belonging to a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowFile {
    /// Absolute path of the canonical source file.
    pub source: PathBuf,
    /// Path relative to the manifest directory, reused as the path inside
    /// each target repository.
    pub relative: PathBuf,
}

/// A named bundle of files, optionally restricted to some languages.
///
/// Immutable after [`crate::manifest::load`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowDefinition {
    pub name: WorkflowName,
    /// Never empty.
    pub files: Vec<WorkflowFile>,
    /// Empty means the workflow applies to every repository.
    pub languages: BTreeSet<Language>,
}

impl WorkflowDefinition {
    /// `true` when the workflow has no language restriction.
    pub fn is_universal(&self) -> bool {
        self.languages.is_empty()
    }

    /// A workflow applies when it is universal or when any of its languages
    /// was detected. Full containment is not required.
    pub fn applies_to(&self, detected: &BTreeSet<Language>) -> bool {
        self.is_universal() || !self.languages.is_disjoint(detected)
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

/// A repository found in a workspace together with its detected languages.
///
/// Recomputed on every scan, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryProfile {
    /// Directory basename inside the workspace.
    pub name: String,
    /// Absolute path of the repository root.
    pub path: PathBuf,
    /// Empty when no language was recognized.
    pub languages: BTreeSet<Language>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
