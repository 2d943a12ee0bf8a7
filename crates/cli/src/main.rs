//! upsync - Idempotent directory uploader
//!
//! Walks a local directory tree and uploads every regular file to an
//! S3-compatible bucket, skipping keys that already exist remotely.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod exit_code;
mod output;
mod prompt;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // --debug forces debug-level logging; otherwise RUST_LOG decides.
    // Logs go to stderr so stdout stays clean for per-file output.
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
