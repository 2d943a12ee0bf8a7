//! CLI command definition and execution
//!
//! upsync is a single-purpose tool, so there is no subcommand tree; the one
//! sync command is flattened into the top-level argument set.

use clap::Parser;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

pub mod sync;

/// upsync - Idempotent directory uploader
///
/// Walks a local directory tree and uploads every regular file to an
/// S3-compatible bucket, skipping keys that already exist remotely.
/// Rerunning after a partial failure transfers only what is still missing.
#[derive(Parser, Debug)]
#[command(name = "upsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Disable progress indication
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,

    #[command(flatten)]
    pub sync: sync::SyncArgs,
}

/// Execute the CLI and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    sync::execute(cli.sync, output_config).await
}
