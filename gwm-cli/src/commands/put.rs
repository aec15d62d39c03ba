//! `gwm put`: copy applicable workflow files into every repository.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use gwm_sync::{ActionOutcome, PutOptions, PutReport, RepoReport};

use super::{format_languages, ManifestArgs, WorkspaceArgs};

/// Arguments for `gwm put`.
#[derive(Args, Debug)]
pub struct PutArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Show what would be written without writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PutArgs {
    pub fn run(self, verbose: bool) -> Result<ExitCode> {
        let options = PutOptions {
            dry_run: self.dry_run,
            verbose,
            target_dir: self.workspace.target_dir.clone(),
        };
        tracing::debug!(
            manifest = %self.manifest.workflows.display(),
            workspace = %self.workspace.target_root.display(),
            "starting put"
        );
        let report = gwm_sync::put(
            &self.manifest.workflows,
            &self.workspace.target_root,
            &self.workspace.ignore_set(),
            &options,
        )
        .context("put failed")?;

        if self.json {
            println!("{}", report.to_json().context("failed to serialize put report")?);
        } else {
            print_report(&report);
        }

        if report.has_failures() {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn print_report(report: &PutReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    if report.dry_run {
        println!("{}", "DRY RUN: no files will be written".yellow().bold());
    }
    if report.repositories.is_empty() {
        println!("{prefix}No repositories found.");
        return;
    }

    for repo in &report.repositories {
        print_repo(repo, report.dry_run, prefix);
    }

    for failure in report.failures() {
        eprintln!("{} {failure}", "error:".red().bold());
    }

    let counts = report.counts();
    println!(
        "{prefix}{} repositories | {} created | {} updated | {} unchanged | {} failed",
        report.repositories.len(),
        counts.created,
        counts.updated,
        counts.unchanged,
        counts.failed,
    );
}

fn print_repo(repo: &RepoReport, dry_run: bool, prefix: &str) {
    let languages = format_languages(&repo.languages, "-");
    if repo.actions.is_empty() {
        println!("{prefix}✓ '{}' ({languages}) — nothing to do", repo.name);
        return;
    }

    let counts = repo.counts(dry_run);
    let mark = if counts.failed > 0 {
        "✗".red().bold()
    } else {
        "✓".green().bold()
    };
    println!(
        "{prefix}{mark} '{}' ({languages}) — {} created, {} updated, {} unchanged",
        repo.name, counts.created, counts.updated, counts.unchanged,
    );

    for action in &repo.actions {
        let failed = !dry_run && action.outcome.is_planned();
        let symbol = if failed {
            "✗".red()
        } else {
            match action.outcome {
                ActionOutcome::Created | ActionOutcome::WouldCreate => "+".green(),
                ActionOutcome::Updated | ActionOutcome::WouldUpdate => "~".yellow(),
                ActionOutcome::SkippedUnchanged | ActionOutcome::WouldSkipUnchanged => {
                    "·".bright_black()
                }
            }
        };
        let relative = action
            .target
            .strip_prefix(&repo.path)
            .unwrap_or(&action.target);
        println!(
            "  {symbol}  {:<22} {} [{}]",
            action.outcome.to_string(),
            relative.display(),
            action.workflow,
        );
    }
}
