use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

/// Endpoints and transport settings for the remote quote service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// The symbol search endpoint (e.g., ".../v1/finance/search").
    pub search_url: String,
    /// The chart endpoint; the symbol is appended as the last path segment.
    pub chart_url: String,
    /// Sent as the `User-Agent` header on every request.
    pub user_agent: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_url: "https://query2.finance.yahoo.com/v1/finance/search".to_string(),
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Contains parameters for report assembly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// What to do when a single window does not have enough bars.
    pub on_window_error: WindowFailurePolicy,
}

/// How a failure in one trailing window affects the rest of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum WindowFailurePolicy {
    /// The first failing window aborts the whole report.
    #[default]
    Abort,
    /// Failing windows are reported as unavailable; the others are kept.
    Report,
}

/// Contains parameters for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to daily-rolling files in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            directory: None,
        }
    }
}
