//! `gwm list_workflows`: show the workflows a manifest declares.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use gwm_core::{Manifest, WorkflowDefinition};

use super::{format_languages, ManifestArgs};

/// Arguments for `gwm list_workflows`.
#[derive(Args, Debug)]
pub struct ListWorkflowsArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct WorkflowJson {
    name: String,
    /// Empty means every repository.
    languages: Vec<String>,
    files: Vec<String>,
}

#[derive(Tabled)]
struct WorkflowRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LANGUAGES")]
    languages: String,
    #[tabled(rename = "FILES")]
    files: String,
}

impl ListWorkflowsArgs {
    pub fn run(self) -> Result<ExitCode> {
        let manifest = gwm_sync::list_workflows(&self.manifest.workflows)
            .with_context(|| format!("cannot list {}", self.manifest.workflows.display()))?;

        if self.json {
            print_json(&manifest)?;
        } else {
            print_table(&manifest);
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Each workflow with its files as repository-relative paths.
fn relative_files(
    manifest: &Manifest,
) -> impl Iterator<Item = (&WorkflowDefinition, Vec<String>)> {
    manifest.workflows().iter().map(|wf| {
        let files = wf
            .files
            .iter()
            .map(|f| f.relative.display().to_string())
            .collect();
        (wf, files)
    })
}

fn print_json(manifest: &Manifest) -> Result<()> {
    let payload: Vec<WorkflowJson> = relative_files(manifest)
        .map(|(wf, files)| WorkflowJson {
            name: wf.name.to_string(),
            languages: wf.languages.iter().map(|l| l.as_str().to_string()).collect(),
            files,
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize workflows JSON")?
    );
    Ok(())
}

fn print_table(manifest: &Manifest) {
    if manifest.is_empty() {
        println!("No workflows declared in {}.", manifest.path().display());
        return;
    }
    let rows: Vec<WorkflowRow> = relative_files(manifest)
        .map(|(wf, files)| WorkflowRow {
            name: wf.name.to_string(),
            languages: format_languages(&wf.languages, "*"),
            files: files.join("\n"),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
