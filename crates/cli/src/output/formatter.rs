//! Console output for per-file sync results
//!
//! Every line the tool prints goes through the [`Formatter`] so the
//! quiet/JSON/color rules live in one place. Informational lines go to
//! stdout; errors and warnings go to stderr, which keeps stdout parseable
//! under `--json`.

use serde::Serialize;

use super::OutputConfig;

/// Severity of a formatted line: decides marker, color, and stream
#[derive(Debug, Clone, Copy)]
enum Level {
    Success,
    Warning,
    Error,
}

impl Level {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Level::Success => ("✓", "\x1b[32m"),
            Level::Warning => ("⚠", "\x1b[33m"),
            Level::Error => ("✗", "\x1b[31m"),
        }
    }
}

/// Applies the output configuration to every line the CLI prints
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Colors are dropped when asked for, and always in JSON mode
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    fn emit(&self, level: Level, message: &str) {
        let (marker, color) = level.style();
        let line = if self.colors_enabled() {
            format!("{color}{marker}\x1b[0m {message}")
        } else {
            format!("{marker} {message}")
        };
        match level {
            Level::Success => println!("{line}"),
            Level::Warning | Level::Error => eprintln!("{line}"),
        }
    }

    /// Success line for an uploaded file
    ///
    /// Suppressed in quiet mode; JSON mode reports outcomes as records
    /// instead of check marks.
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        self.emit(Level::Success, message);
    }

    /// Error line, printed even in quiet mode
    ///
    /// In JSON mode the message becomes an `{"error": ...}` record on
    /// stderr so stdout stays a stream of outcome records.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let record = serde_json::json!({ "error": message });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&record).unwrap_or_else(|_| message.to_string())
            );
            return;
        }
        self.emit(Level::Error, message);
    }

    /// Warning line; suppressed in quiet and JSON modes
    pub fn warning(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        self.emit(Level::Warning, message);
    }

    /// Pretty-printed JSON record to stdout
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Plain line to stdout, suppressed in quiet mode
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        println!("{message}");
    }
}
