//! `gwm list_repos`: show the repositories of a workspace.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use gwm_detector::existing_workflow_files;

use super::{format_languages, WorkspaceArgs};

/// Arguments for `gwm list_repos`.
#[derive(Args, Debug)]
pub struct ListReposArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct RepoJson {
    name: String,
    path: String,
    languages: Vec<String>,
    existing_workflows: Vec<String>,
}

#[derive(Tabled)]
struct RepoRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LANGUAGES")]
    languages: String,
    #[tabled(rename = "EXISTING WORKFLOWS")]
    existing: String,
}

impl ListReposArgs {
    pub fn run(self) -> Result<ExitCode> {
        let ws = &self.workspace;
        let repos = gwm_sync::list_repos(&ws.target_root, &ws.ignore_set())
            .with_context(|| format!("cannot scan {}", ws.target_root.display()))?;

        if self.json {
            let payload: Vec<RepoJson> = repos
                .iter()
                .map(|repo| RepoJson {
                    name: repo.name.clone(),
                    path: repo.path.display().to_string(),
                    languages: repo.languages.iter().map(|l| l.as_str().to_string()).collect(),
                    existing_workflows: existing_workflow_files(&repo.path, &ws.target_dir),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize repos JSON")?
            );
            return Ok(ExitCode::SUCCESS);
        }

        if repos.is_empty() {
            println!("No repositories under {}.", ws.target_root.display());
            return Ok(ExitCode::SUCCESS);
        }
        let rows: Vec<RepoRow> = repos
            .iter()
            .map(|repo| RepoRow {
                name: repo.name.clone(),
                languages: format_languages(&repo.languages, "-"),
                existing: existing_workflow_files(&repo.path, &ws.target_dir).join("\n"),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(ExitCode::SUCCESS)
    }
}
