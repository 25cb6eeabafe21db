//! Warning/error accounting and the three abort levels

use crate::config::compile_time::diagnostics::{
    DEFAULT_MAX_ERRORS, DEFAULT_MAX_WARNINGS, MAX_DEBUG_LEVEL, MAX_ERRORS_CEILING,
    MAX_WARNINGS_CEILING,
};
use crate::config::runtime::ReaderPreferences;
use crate::logging::{codes, Code};
use crate::{log_error, log_warning};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticLimits {
    pub max_warnings: u32,
    pub max_errors: u32,
    pub debug_level: u8,
}

impl DiagnosticLimits {
    /// Limits are clamped into 1..=ceiling; debug level into 0..=MAX_DEBUG_LEVEL
    pub fn new(max_warnings: u32, max_errors: u32, debug_level: u8) -> Self {
        Self {
            max_warnings: max_warnings.clamp(1, MAX_WARNINGS_CEILING),
            max_errors: max_errors.clamp(1, MAX_ERRORS_CEILING),
            debug_level: debug_level.min(MAX_DEBUG_LEVEL),
        }
    }

    pub fn from_preferences(preferences: &ReaderPreferences) -> Self {
        Self::new(
            preferences.max_warnings,
            preferences.max_errors,
            preferences.debug_level,
        )
    }
}

impl Default for DiagnosticLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WARNINGS, DEFAULT_MAX_ERRORS, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticSeverity {
    Warning,
    Error,
}

/// One recorded warning or error
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: Code,
    pub severity: DiagnosticSeverity,
    pub line: u32,
    pub message: String,
    pub parse_fatal: bool,
    pub scan_fatal: bool,
}

impl Diagnostic {
    /// Listing line, more detail at higher debug levels
    pub fn render(&self, debug_level: u8) -> String {
        let tag = match self.severity {
            DiagnosticSeverity::Warning => "WARNING",
            DiagnosticSeverity::Error => "ERROR",
        };
        let mut line = format!("{:>6}: {} {}: {}", self.line, tag, self.code, self.message);
        if debug_level >= 1 {
            line.push_str(&format!(" [{}]", codes::get_category(self.code.as_str())));
        }
        if debug_level >= 2 {
            line.push_str(&format!(" ({})", codes::get_action(self.code.as_str())));
        }
        line
    }
}

/// Per-load diagnostic state. Abort flags only ever go false -> true and
/// stop_scan implies stop_parse implies stop_load.
#[derive(Debug, Clone)]
pub struct DiagnosticState {
    limits: DiagnosticLimits,
    warnings: u32,
    errors: u32,
    stop_scan: bool,
    stop_parse: bool,
    stop_load: bool,
    records: Vec<Diagnostic>,
}

impl DiagnosticState {
    pub fn new(limits: DiagnosticLimits) -> Self {
        Self {
            limits,
            warnings: 0,
            errors: 0,
            stop_scan: false,
            stop_parse: false,
            stop_load: false,
            records: Vec::new(),
        }
    }

    fn message_for(code: Code, extra: &str) -> String {
        let description = codes::get_description(code.as_str());
        if extra.is_empty() {
            description.to_string()
        } else {
            format!("{}: {}", description, extra)
        }
    }

    /// Record a warning; reaching the warning limit escalates to a scan-fatal error
    pub fn warn(&mut self, code: Code, line: u32, extra: &str) {
        self.warnings += 1;
        let message = Self::message_for(code, extra);
        log_warning!(code, &message, "line" => line);
        self.records.push(Diagnostic {
            code,
            severity: DiagnosticSeverity::Warning,
            line,
            message,
            parse_fatal: false,
            scan_fatal: false,
        });

        self.enforce_warning_limit(line);
    }

    /// Escalate once the warning count has reached the limit. The limit can
    /// be lowered after warnings were already counted, so this is also run
    /// whenever the limit changes.
    pub fn enforce_warning_limit(&mut self, line: u32) {
        if self.warnings >= self.limits.max_warnings && !self.stop_scan {
            self.error(
                codes::limits::MAX_WARNINGS_EXCEEDED,
                line,
                &format!("limit is {}", self.limits.max_warnings),
                true,
                true,
            );
        }
    }

    /// Record an error. Every error stops loading; `parse_fatal` also stops
    /// parsing, and `scan_fatal` (which implies `parse_fatal`) or reaching the
    /// error limit stops scanning.
    pub fn error(&mut self, code: Code, line: u32, extra: &str, scan_fatal: bool, parse_fatal: bool) {
        self.errors += 1;
        let parse_fatal = parse_fatal || scan_fatal;
        let message = Self::message_for(code, extra);
        log_error!(code, &message, "line" => line, "parse_fatal" => parse_fatal);
        self.records.push(Diagnostic {
            code,
            severity: DiagnosticSeverity::Error,
            line,
            message,
            parse_fatal,
            scan_fatal,
        });

        self.stop_load = true;
        let limit_reached = self.errors >= self.limits.max_errors;
        if parse_fatal {
            self.stop_parse = true;
            if scan_fatal || limit_reached {
                self.stop_scan = true;
            }
        } else if limit_reached {
            self.stop_parse = true;
            self.stop_scan = true;
        }
    }

    pub fn set_max_warnings(&mut self, max_warnings: u32) {
        self.limits.max_warnings = max_warnings.clamp(1, MAX_WARNINGS_CEILING);
    }

    pub fn set_max_errors(&mut self, max_errors: u32) {
        self.limits.max_errors = max_errors.clamp(1, MAX_ERRORS_CEILING);
    }

    pub fn set_debug_level(&mut self, debug_level: u8) {
        self.limits.debug_level = debug_level.min(MAX_DEBUG_LEVEL);
    }

    pub fn limits(&self) -> DiagnosticLimits {
        self.limits
    }

    pub fn warnings(&self) -> u32 {
        self.warnings
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn stop_scan(&self) -> bool {
        self.stop_scan
    }

    pub fn stop_parse(&self) -> bool {
        self.stop_parse
    }

    pub fn stop_load(&self) -> bool {
        self.stop_load
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Diagnostic> {
        self.records
    }

    /// Number of records carrying `code`
    pub fn count_of(&self, code: Code) -> usize {
        self.records.iter().filter(|d| d.code == code).count()
    }
}

impl Default for DiagnosticState {
    fn default() -> Self {
        Self::new(DiagnosticLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(state: &DiagnosticState) -> (bool, bool, bool) {
        (state.stop_scan(), state.stop_parse(), state.stop_load())
    }

    #[test]
    fn test_warning_below_limit_sets_nothing() {
        let mut state = DiagnosticState::new(DiagnosticLimits::new(5, 5, 0));
        state.warn(codes::semantic::EXCESS_ARGS, 3, "");
        assert_eq!(state.warnings(), 1);
        assert_eq!(state.errors(), 0);
        assert_eq!(flags(&state), (false, false, false));
    }

    #[test]
    fn test_first_warning_at_limit_of_one_stops_everything() {
        let mut state = DiagnosticState::new(DiagnosticLimits::new(1, 10, 0));
        state.warn(codes::syntax::UNKNOWN_ALIST_LABEL, 1, "FOO>");
        assert_eq!(flags(&state), (true, true, true));
        assert_eq!(state.count_of(codes::limits::MAX_WARNINGS_EXCEEDED), 1);
        assert_eq!(state.errors(), 1);
    }

    #[test]
    fn test_warnings_past_limit_escalate_once() {
        let mut state = DiagnosticState::new(DiagnosticLimits::new(2, 10, 0));
        for _ in 0..4 {
            state.warn(codes::semantic::MISSING_ARGS, 1, "");
        }
        assert_eq!(state.count_of(codes::limits::MAX_WARNINGS_EXCEEDED), 1);
    }

    #[test]
    fn test_lowered_limit_escalates_on_next_warning() {
        let mut state = DiagnosticState::new(DiagnosticLimits::new(10, 10, 0));
        for _ in 0..3 {
            state.warn(codes::semantic::MISSING_ARGS, 1, "");
        }
        state.set_max_warnings(1);
        assert!(!state.stop_scan());

        state.warn(codes::semantic::MISSING_ARGS, 2, "");
        assert_eq!(state.count_of(codes::limits::MAX_WARNINGS_EXCEEDED), 1);
        assert_eq!(flags(&state), (true, true, true));
    }

    #[test]
    fn test_enforce_after_lowering_limit() {
        let mut state = DiagnosticState::new(DiagnosticLimits::new(10, 10, 0));
        state.warn(codes::semantic::MISSING_ARGS, 1, "");
        state.warn(codes::semantic::MISSING_ARGS, 1, "");
        state.set_max_warnings(2);
        state.enforce_warning_limit(4);
        state.enforce_warning_limit(5);
        assert_eq!(state.count_of(codes::limits::MAX_WARNINGS_EXCEEDED), 1);
        assert!(state.stop_scan());
    }

    #[test]
    fn test_non_fatal_error_only_stops_load() {
        let mut state = DiagnosticState::new(DiagnosticLimits::new(10, 5, 0));
        state.error(codes::syntax::MISSING_REQUIRED_ENTRY, 7, "TYPE>", false, false);
        assert_eq!(flags(&state), (false, false, true));
    }

    #[test]
    fn test_parse_fatal_error() {
        let mut state = DiagnosticState::new(DiagnosticLimits::new(10, 5, 0));
        state.error(codes::lexical::UNKNOWN_TOKEN, 2, "FOO", false, true);
        assert_eq!(flags(&state), (false, true, true));
    }

    #[test]
    fn test_scan_fatal_implies_parse_fatal() {
        let mut state = DiagnosticState::new(DiagnosticLimits::new(10, 5, 0));
        state.error(codes::lexical::UNEXPECTED_EOF_IN_TOKEN, 2, "", true, false);
        assert_eq!(flags(&state), (true, true, true));
    }

    #[test]
    fn test_error_limit_stops_scanning() {
        let mut state = DiagnosticState::new(DiagnosticLimits::new(10, 2, 0));
        state.error(codes::syntax::MISSING_REQUIRED_ENTRY, 1, "", false, false);
        assert_eq!(flags(&state), (false, false, true));
        state.error(codes::syntax::MISSING_REQUIRED_ENTRY, 2, "", false, false);
        assert_eq!(flags(&state), (true, true, true));
    }

    #[test]
    fn test_limits_are_clamped() {
        let limits = DiagnosticLimits::new(0, 1_000, 9);
        assert_eq!(limits.max_warnings, 1);
        assert_eq!(limits.max_errors, MAX_ERRORS_CEILING);
        assert_eq!(limits.debug_level, MAX_DEBUG_LEVEL);

        let mut state = DiagnosticState::default();
        state.set_max_warnings(500);
        assert_eq!(state.limits().max_warnings, MAX_WARNINGS_CEILING);
    }

    #[test]
    fn test_render_includes_line_code_and_extra() {
        let mut state = DiagnosticState::default();
        state.warn(codes::syntax::UNKNOWN_ALIST_LABEL, 12, "MAX_ERRORS>");
        let rendered = state.records()[0].render(0);
        assert!(rendered.contains("12"));
        assert!(rendered.contains("WARNING W045"));
        assert!(rendered.ends_with("MAX_ERRORS>"));
        assert!(state.records()[0].render(1).contains("[Syntax]"));
    }
}
