//! Logging setup shared by the Crosscast binaries
//!
//! Everything logs through `tracing` to stderr. Each binary picks the
//! profile that fits how it runs: the gateway always logs and takes
//! its format and level from the environment, the one-shot CLI stays
//! at `error` unless `--verbose` lifts it, and the TUI initializes
//! logging only under `--verbose` because stderr and the drawn UI
//! share the terminal.
//!
//! # Examples
//!
//! ```no_run
//! use libcrosscast::logging::LoggingConfig;
//!
//! // Long-running service: CROSSCAST_LOG_FORMAT / CROSSCAST_LOG_LEVEL
//! LoggingConfig::from_env().init();
//! ```

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Output format for a binary's log stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain target-free lines, readable next to normal output
    #[default]
    Text,
    /// One JSON object per line, for collectors
    Json,
    /// Multi-line output with source locations, for development
    Pretty,
}

impl LogFormat {
    fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!(
                "Unknown log format: {} (expected text, json, or pretty)",
                other
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format plus default level for one binary's log stream
///
/// `RUST_LOG` always wins over the profile's level, so any single run
/// can be inspected without touching flags.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    format: LogFormat,
    default_level: String,
}

impl LoggingConfig {
    /// Profile from `CROSSCAST_LOG_FORMAT` and `CROSSCAST_LOG_LEVEL`,
    /// falling back to text at `info`. Unparseable values fall back
    /// rather than failing startup.
    pub fn from_env() -> Self {
        let format = std::env::var("CROSSCAST_LOG_FORMAT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let default_level =
            std::env::var("CROSSCAST_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            format,
            default_level,
        }
    }

    /// Quiet text profile for one-shot CLI runs: errors only, lifted
    /// to `debug` by the verbose flag.
    pub fn quiet(verbose: bool) -> Self {
        Self {
            format: LogFormat::Text,
            default_level: if verbose { "debug" } else { "error" }.to_string(),
        }
    }

    /// Debug text profile for interactive binaries behind a verbose
    /// flag.
    pub fn interactive_debug() -> Self {
        Self {
            format: LogFormat::Text,
            default_level: "debug".to_string(),
        }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn default_level(&self) -> &str {
        &self.default_level
    }

    /// Install the global subscriber. Call once per process.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber is already installed.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_level));

        match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(true)
                .with_file(true)
                .with_line_number(true)
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_target(false)
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init(),
        }
    }
}
