//! sync command - upload a directory tree to a bucket
//!
//! Walks the directory, uploads each regular file, and skips keys that are
//! already present remotely. Per-file failures are printed and the walk
//! continues; a completed walk exits 0 regardless of how many files failed.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use upsync_core::{
    load_credentials, SyncEvent, SyncReporter, Synchronizer, DEFAULT_CREDENTIALS_FILE,
};
use upsync_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};
use crate::prompt;

/// Upload a directory tree
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Local directory to upload (prompted for when omitted)
    pub directory: Option<String>,

    /// Destination bucket (prompted for when omitted)
    pub bucket: Option<String>,

    /// Key prefix prepended to every relative path (prompted for when omitted)
    pub prefix: Option<String>,

    /// Path to the JSON credential file
    #[arg(long, default_value = DEFAULT_CREDENTIALS_FILE)]
    pub credentials: PathBuf,
}

#[derive(Debug, Serialize)]
struct SyncOutput {
    status: &'static str,
    source: String,
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
}

/// `s3://bucket/key` display form for a remote object
fn object_url(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

/// Prints one line per file as the walk progresses
struct ConsoleReporter<'a> {
    formatter: &'a Formatter,
    progress: &'a ProgressBar,
    bucket: &'a str,
}

impl SyncReporter for ConsoleReporter<'_> {
    fn on_event(&self, event: &SyncEvent) {
        match event {
            SyncEvent::Uploaded {
                path,
                key,
                size_bytes,
            } => {
                self.progress.set_message(key);
                let target = object_url(self.bucket, key);
                if self.formatter.is_json() {
                    self.formatter.json(&SyncOutput {
                        status: "uploaded",
                        source: path.display().to_string(),
                        target,
                        size_bytes: Some(*size_bytes),
                        size_human: Some(humansize::format_size(
                            *size_bytes as u64,
                            humansize::BINARY,
                        )),
                    });
                } else {
                    self.formatter.success(&format!(
                        "{} -> {target} ({})",
                        path.display(),
                        humansize::format_size(*size_bytes as u64, humansize::BINARY)
                    ));
                }
            }
            SyncEvent::Skipped { path, key } => {
                self.progress.set_message(key);
                let target = object_url(self.bucket, key);
                if self.formatter.is_json() {
                    self.formatter.json(&SyncOutput {
                        status: "skipped",
                        source: path.display().to_string(),
                        target,
                        size_bytes: None,
                        size_human: None,
                    });
                } else {
                    self.formatter
                        .println(&format!("Already exists, skipping: {target}"));
                }
            }
            SyncEvent::Failed { path, error, .. } => {
                self.formatter
                    .error(&format!("Failed to upload {}: {error}", path.display()));
            }
            SyncEvent::CheckFailed { key, error } => {
                self.formatter.warning(&format!(
                    "Existence check failed for {}, uploading anyway: {error}",
                    object_url(self.bucket, key)
                ));
            }
        }
    }
}

/// Resolve an argument, prompting for it when absent
fn prompt_or(
    value: Option<String>,
    label: &str,
    formatter: &Formatter,
) -> Result<String, ExitCode> {
    if let Some(v) = value {
        return Ok(v);
    }
    match prompt::prompt_line(label) {
        Ok(line) => Ok(line),
        Err(e) => {
            formatter.error(&format!("Failed to read input: {e}"));
            Err(ExitCode::GeneralError)
        }
    }
}

/// Execute the sync command
pub async fn execute(args: SyncArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    // Credential problems abort before anything is walked or transferred
    let credentials = match load_credentials(&args.credentials) {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let directory = match prompt_or(args.directory, "Directory to upload", &formatter) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let bucket = match prompt_or(args.bucket, "Target bucket", &formatter) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let prefix = match prompt_or(args.prefix, "Key prefix (empty for none)", &formatter) {
        Ok(v) => v,
        Err(code) => return code,
    };

    if bucket.is_empty() {
        formatter.error("Bucket name must not be empty");
        return ExitCode::UsageError;
    }

    let client = match S3Client::new(&credentials).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let root = PathBuf::from(&directory);
    let synchronizer = Synchronizer::new(&client, bucket.clone(), prefix);
    let progress = ProgressBar::spinner(&output_config, &format!("Scanning {directory}"));
    let reporter = ConsoleReporter {
        formatter: &formatter,
        progress: &progress,
        bucket: &bucket,
    };

    match synchronizer.sync_directory(&root, &reporter).await {
        Ok(summary) => {
            progress.finish_and_clear();
            tracing::debug!(
                uploaded = summary.uploaded,
                skipped = summary.skipped,
                failed = summary.failed,
                bytes = summary.bytes_uploaded,
                "run complete"
            );
            ExitCode::Success
        }
        Err(e) => {
            progress.finish_and_clear();
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
