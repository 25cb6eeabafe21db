//! Log events emitted by the reader

use super::codes::{self, Code};
use crate::utils::Span;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
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
}

/// A single log record
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn build(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: truncate_message(message),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(error_code: Code, message: &str) -> Self {
        Self::build(LogLevel::Error, error_code, message)
    }

    /// Uncoded warning
    pub fn warning(message: &str) -> Self {
        Self::build(LogLevel::Warning, Code::new("W000"), message)
    }

    pub fn warning_with_code(warning_code: Code, message: &str) -> Self {
        Self::build(LogLevel::Warning, warning_code, message)
    }

    pub fn info(message: &str) -> Self {
        Self::build(LogLevel::Info, Code::new("I000"), message)
    }

    /// Info event carrying a success code
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::build(LogLevel::Info, success_code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::build(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    /// Single-line rendering used by the console logger
    pub fn format(&self) -> String {
        let location = self
            .span
            .as_ref()
            .map(|s| format!(" at line {}", s.start().line))
            .unwrap_or_default();

        let mut line = format!(
            "[{}] {} - {}{}",
            self.level.as_str(),
            self.code.as_str(),
            self.message,
            location
        );

        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            line.push_str(&format!(" ({})", pairs.join(", ")));
        }

        line
    }

    /// JSON rendering used by the structured logger
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if self.is_error() {
            json["error_metadata"] = serde_json::json!({
                "recoverable": codes::is_recoverable(self.code.as_str()),
                "requires_halt": self.requires_halt(),
                "description": codes::get_description(self.code.as_str()),
                "recommended_action": codes::get_action(self.code.as_str()),
            });
        }

        if let Some(span) = &self.span {
            json["span"] = serde_json::json!({
                "start_line": span.start().line,
                "end_line": span.end().line,
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::to_value(&self.context)?;
        }

        serde_json::to_string(&json)
    }
}

fn truncate_message(message: &str) -> String {
    let limit = super::config::get_max_log_message_length();
    if message.len() <= limit {
        return message.to_string();
    }
    let mut end = limit;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &message[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::Position;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "File not found");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E005");
        assert_eq!(event.category(), "FileProcessing");
    }

    #[test]
    fn test_warning_with_code() {
        let event =
            LogEvent::warning_with_code(codes::semantic::EXCESS_ARGS, "Excess arguments");
        assert!(event.is_warning());
        assert_eq!(event.severity(), "Low");
        assert!(!event.requires_halt());
    }

    #[test]
    fn test_format_includes_line_and_context() {
        let span = Span::single(Position::new(0, 12, 1));
        let event = LogEvent::error(codes::lexical::UNKNOWN_TOKEN, "Unknown token")
            .with_span(span)
            .with_context("text", "FOO");
        let formatted = event.format();

        assert!(formatted.contains("[ERROR]"));
        assert!(formatted.contains("E025"));
        assert!(formatted.contains("at line 12"));
        assert!(formatted.contains("text=FOO"));
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::file_processing::PERMISSION_DENIED, "Access denied")
            .with_context("file", "test.odb");

        let json = event.format_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["code"], "E009");
        assert_eq!(value["context"]["file"], "test.odb");
        assert_eq!(value["error_metadata"]["requires_halt"], true);
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let long = "x".repeat(super::super::config::get_max_log_message_length() + 10);
        let event = LogEvent::info(&long);
        assert!(event.message.ends_with("..."));
        assert!(event.message.len() < long.len());
    }
}
