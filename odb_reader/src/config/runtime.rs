// RUNTIME PREFERENCES (User Experience)

use crate::config::compile_time::diagnostics::{
    DEFAULT_MAX_ERRORS, DEFAULT_MAX_WARNINGS, MAX_DEBUG_LEVEL,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Parsed value of an environment variable, or `default` when unset or malformed
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to require the .odb extension
    pub require_odb_extension: bool,

    /// Whether to log file size and line statistics
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_odb_extension: env_or(env_vars::REQUIRE_ODB_EXTENSION, false),
            enable_performance_logging: env_or(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

/// Diagnostic limits and header handling for a load
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderPreferences {
    /// Warnings allowed before the load is aborted
    pub max_warnings: u32,

    /// Errors allowed before scanning stops
    pub max_errors: u32,

    /// Listing verbosity, 0..=3
    pub debug_level: u8,

    /// Whether MAX-WARNINGS> / MAX-ERRORS> in the file header replace the limits above
    pub honor_header_limits: bool,
}

impl Default for ReaderPreferences {
    fn default() -> Self {
        Self {
            max_warnings: env_or(env_vars::READER_MAX_WARNINGS, DEFAULT_MAX_WARNINGS),
            max_errors: env_or(env_vars::READER_MAX_ERRORS, DEFAULT_MAX_ERRORS),
            debug_level: env_or(env_vars::READER_DEBUG_LEVEL, 0u8).min(MAX_DEBUG_LEVEL),
            honor_header_limits: env_or(env_vars::READER_HONOR_HEADER_LIMITS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether every scanned token is logged at debug level
    pub trace_tokens: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            trace_tokens: env_or(env_vars::LEXICAL_TRACE_TOKENS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Whether entering and leaving each section is logged
    pub log_section_progress: bool,

    /// Whether skipped SYSTEM> entries are logged at debug level
    pub log_skipped_entries: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            log_section_progress: env_or(env_vars::PARSER_LOG_SECTIONS, true),
            log_skipped_entries: env_or(env_vars::PARSER_LOG_SKIPPED, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level written by the configured logger
    pub min_log_level: LogLevel,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Failure to read a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum RuntimeConfigError {
    #[error("Cannot read configuration file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid runtime configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub reader: ReaderPreferences,
    pub lexical: LexicalPreferences,
    pub parser: ParserPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML text; missing tables and keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, RuntimeConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load preferences from a TOML file
    pub fn load(path: &Path) -> Result<Self, RuntimeConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| RuntimeConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_ODB_EXTENSION: &str = "ODB_REQUIRE_ODB_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "ODB_ENABLE_PERFORMANCE_LOGGING";

    // Reader
    pub const READER_MAX_WARNINGS: &str = "ODB_READER_MAX_WARNINGS";
    pub const READER_MAX_ERRORS: &str = "ODB_READER_MAX_ERRORS";
    pub const READER_DEBUG_LEVEL: &str = "ODB_READER_DEBUG_LEVEL";
    pub const READER_HONOR_HEADER_LIMITS: &str = "ODB_READER_HONOR_HEADER_LIMITS";

    // Lexical
    pub const LEXICAL_TRACE_TOKENS: &str = "ODB_LEXICAL_TRACE_TOKENS";

    // Parser
    pub const PARSER_LOG_SECTIONS: &str = "ODB_PARSER_LOG_SECTIONS";
    pub const PARSER_LOG_SKIPPED: &str = "ODB_PARSER_LOG_SKIPPED";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "ODB_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "ODB_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "ODB_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "ODB_LOGGING_INCLUDE_FILE_CONTEXT";
}
