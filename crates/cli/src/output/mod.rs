//! Output formatting utilities
//!
//! Per-file outcome lines in human-readable and JSON forms, the progress
//! spinner shown during the walk, and the flag-derived [`OutputConfig`]
//! shared by both.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::ProgressBar;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress indication
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}
