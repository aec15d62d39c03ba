//! `gwm diff`: show unified diffs for what `put` would write.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::{ManifestArgs, WorkspaceArgs};

/// Arguments for `gwm diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<ExitCode> {
        let ws = &self.workspace;
        let repos = gwm_sync::preview_diffs(
            &self.manifest.workflows,
            &ws.target_root,
            &ws.ignore_set(),
            &ws.target_dir,
        )
        .context("diff failed")?;

        if repos.is_empty() {
            println!("No differences.");
            return Ok(ExitCode::SUCCESS);
        }

        let mut failed = false;
        for repo in repos {
            println!("{}", format!("# {}", repo.name).bold());
            for diff in repo.diffs {
                print!("{}", diff.unified_diff);
                if !diff.unified_diff.ends_with('\n') {
                    println!();
                }
            }
            for failure in &repo.failures {
                eprintln!("{} {failure}", "error:".red().bold());
                failed = true;
            }
        }

        if failed {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }
}
