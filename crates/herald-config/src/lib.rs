//! Shared configuration for the Herald voice-command relay.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a
//! configuration file (`--config-path` or `HERALD_CONFIG_PATH`), then
//! `HERALD_*` environment variables, and finally command-line flags. The
//! command node address is kept as the raw string the user supplied; it is
//! parsed when a command is sent so a malformed address is reported as such
//! rather than as a configuration failure.

mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LANGUAGE, DEFAULT_LOG_FILTER, DEFAULT_MAX_RESULTS, default_language,
    default_language_string, default_log_filter, default_log_filter_string, default_log_format,
    default_max_results,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the pipeline and the binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HERALD")]
pub struct Config {
    /// Command node address in `host:port` form.
    #[serde(default)]
    pub target: Option<String>,
    /// Language preference handed to the speech recognizer.
    #[serde(default = "default_language_string")]
    #[ortho_config(default = default_language_string())]
    pub language: String,
    /// Maximum number of candidate phrases requested from the recognizer.
    #[serde(default = "default_max_results")]
    #[ortho_config(default = default_max_results())]
    pub max_results: u8,
    /// Optional transport timeout for command requests, in seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// `tracing` filter expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log lines.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: None,
            language: default_language_string(),
            max_results: default_max_results(),
            request_timeout_secs: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Raw target address, if one was configured.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Recognizer language preference.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Maximum recognizer results.
    #[must_use]
    pub const fn max_results(&self) -> u8 {
        self.max_results
    }

    /// Transport timeout, when one was configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
