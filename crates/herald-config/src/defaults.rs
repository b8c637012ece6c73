use crate::logging::LogFormat;

/// Language requested from the speech recognizer unless overridden.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Only the highest-confidence phrase is ever used, so one result suffices.
pub const DEFAULT_MAX_RESULTS: u8 = 1;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default recognizer language.
pub fn default_language() -> &'static str {
    DEFAULT_LANGUAGE
}

/// Owned language value used where allocation is required (e.g. serde).
pub fn default_language_string() -> String {
    DEFAULT_LANGUAGE.to_owned()
}

/// Default number of recognizer results.
pub fn default_max_results() -> u8 {
    DEFAULT_MAX_RESULTS
}

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
