pub mod diff;
pub mod list_repos;
pub mod list_workflows;
pub mod put;

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Args;
use gwm_core::Language;

/// Manifest location, shared by every command that reads workflows.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Path to the workflow manifest (TOML).
    #[arg(short = 'w', long = "workflows", env = "GWM_WORKFLOWS", value_name = "PATH")]
    pub workflows: PathBuf,
}

/// Workspace selection, shared by every command that scans repositories.
#[derive(Args, Debug)]
pub struct WorkspaceArgs {
    /// Directory whose immediate subdirectories are the repositories.
    #[arg(
        short = 't',
        long = "target-root",
        env = "GWM_TARGET_ROOT",
        default_value = ".",
        value_name = "DIR"
    )]
    pub target_root: PathBuf,

    /// Repository names to skip (exact, case-sensitive match).
    #[arg(long = "ignore-repos", value_name = "NAME", num_args = 1..)]
    pub ignore_repos: Vec<String>,

    /// Directory inside each repository that receives workflow files.
    #[arg(long = "target-dir", default_value = ".", value_name = "DIR")]
    pub target_dir: PathBuf,
}

impl WorkspaceArgs {
    pub fn ignore_set(&self) -> BTreeSet<String> {
        self.ignore_repos.iter().cloned().collect()
    }
}

/// `cpp, python`, or `empty` when the set is empty.
pub fn format_languages(languages: &BTreeSet<Language>, empty: &str) -> String {
    if languages.is_empty() {
        return empty.to_string();
    }
    languages
        .iter()
        .map(Language::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
