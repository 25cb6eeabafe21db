//! Fault channel
//!
//! A `SystemError` means the reader broke one of its own preconditions. No
//! input, however malformed, may produce one. Data problems are recorded in
//! `DiagnosticState` instead and never unwind.

use crate::logging::{codes, Code};

pub type SystemResult<T> = Result<T, SystemError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SystemError {
    #[error("Lexer called after scanning stopped (line {line})")]
    LexerAfterStopScan { line: u32 },

    #[error("Token window advanced past end of input")]
    AdvancePastEof,

    #[error("Database mutation '{operation}' attempted after loading stopped")]
    MutationAfterStopLoad { operation: &'static str },

    #[error("Precondition failed in {routine}: expected {expected}, found {found}")]
    Precondition {
        routine: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("Database sink rejected {operation}: {message}")]
    SinkInconsistency {
        operation: &'static str,
        message: String,
    },
}

impl SystemError {
    pub fn precondition(routine: &'static str, expected: &'static str, found: &str) -> Self {
        Self::Precondition {
            routine,
            expected,
            found: found.to_string(),
        }
    }

    pub fn sink(operation: &'static str, message: impl Into<String>) -> Self {
        Self::SinkInconsistency {
            operation,
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        codes::system::INTERNAL_ERROR
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_errors_always_halt() {
        let errors = [
            SystemError::LexerAfterStopScan { line: 3 },
            SystemError::AdvancePastEof,
            SystemError::MutationAfterStopLoad {
                operation: "append_cell",
            },
            SystemError::precondition("parse_cell", "left parenthesis", "symbol"),
            SystemError::sink("declare_predicate", "name in use"),
        ];
        for error in errors {
            assert_eq!(error.error_code(), codes::system::INTERNAL_ERROR);
            assert!(error.requires_halt());
            assert!(!error.is_recoverable());
            assert_eq!(error.category(), "System");
        }
    }

    #[test]
    fn test_messages() {
        let error = SystemError::precondition("parse_cell", "left parenthesis", "symbol");
        assert_eq!(
            error.to_string(),
            "Precondition failed in parse_cell: expected left parenthesis, found symbol"
        );
    }
}
