//! gwm: sync CI workflow files into every repository of a workspace.
//!
//! # Usage
//!
//! ```text
//! gwm list_workflows -w <manifest.toml> [--json]
//! gwm list_repos [-t <workspace>] [--ignore-repos <name>...] [--target-dir <dir>] [--json]
//! gwm put -w <manifest.toml> [-t <workspace>] [--ignore-repos <name>...] [--target-dir <dir>] [--dry-run] [--json]
//! gwm diff -w <manifest.toml> [-t <workspace>] [--ignore-repos <name>...] [--target-dir <dir>]
//! ```

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    diff::DiffArgs, list_repos::ListReposArgs, list_workflows::ListWorkflowsArgs, put::PutArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gwm",
    version,
    about = "Copy shared CI workflow files into the repositories that need them",
    long_about = None,
)]
struct Cli {
    /// Log every planned and applied action.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the workflows declared in a manifest.
    #[command(name = "list_workflows", alias = "list-workflows")]
    ListWorkflows(ListWorkflowsArgs),

    /// List the repositories of a workspace and their detected languages.
    #[command(name = "list_repos", alias = "list-repos")]
    ListRepos(ListReposArgs),

    /// Copy every applicable workflow file into every repository.
    Put(PutArgs),

    /// Show a unified diff of what `put` would change.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::ListWorkflows(args) => args.run(),
        Commands::ListRepos(args) => args.run(),
        Commands::Put(args) => args.run(cli.verbose),
        Commands::Diff(args) => args.run(),
    }
}

/// Log to stderr. `RUST_LOG` wins over the `--verbose` default.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
