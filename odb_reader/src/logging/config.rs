//! Logging configuration
//!
//! Buffer and message limits come from the compile-time profile. Level and
//! output format come from the runtime `LoggingPreferences`, which may be set
//! once per process.

use crate::config::compile_time::logging::{
    LOG_BUFFER_SIZE, MAX_LOG_EVENTS_PER_FILE, MAX_LOG_MESSAGE_LENGTH,
};
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences; fails if already installed
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn include_file_context() -> bool {
    get_runtime_preferences().include_file_context
}

/// Capacity of the in-memory logger
pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_events_per_file() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Validate compile-time logging limits
pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE < 100 {
        return Err(format!("Log buffer size too small: {}", LOG_BUFFER_SIZE));
    }
    if MAX_LOG_EVENTS_PER_FILE > LOG_BUFFER_SIZE {
        return Err("Max log events per file exceeds total buffer size".to_string());
    }
    if MAX_LOG_MESSAGE_LENGTH == 0 {
        return Err("Max log message length must be positive".to_string());
    }
    Ok(())
}

pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         - Log buffer size: {}\n\
         - Max events per file: {}\n\
         - Max message length: {}\n\
         - Min log level: {}\n\
         - Structured logging: {}\n\
         - Console logging: {}\n\
         - Include file context: {}",
        LOG_BUFFER_SIZE,
        MAX_LOG_EVENTS_PER_FILE,
        MAX_LOG_MESSAGE_LENGTH,
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        preferences.include_file_context,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_summary_lists_limits() {
        let summary = get_config_summary();
        assert!(summary.contains("Log buffer size"));
        assert!(summary.contains("Min log level"));
    }

    #[test]
    fn test_limits_are_positive() {
        assert!(get_error_buffer_size() > 0);
        assert!(get_max_log_events_per_file() > 0);
        assert!(get_max_log_message_length() > 0);
    }
}
