use crate::diagnostics::{Diagnostic, DiagnosticLimits, DiagnosticState};
use crate::lexical::LexicalMetrics;
use crate::logging::codes;
use crate::syntax::ParseOutcome;
use crate::{log_error, log_success};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// How far the reader got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadOutcome {
    FullyLoaded,
    LoadedWithWarnings,
    /// Loading stopped after at least one item reached the sink
    AbortedWithPartialData,
    AbortedWithNoData,
}

/// Highest abort flag raised during the load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AbortLevel {
    None,
    Load,
    Parse,
    Scan,
}

impl AbortLevel {
    pub fn of(diagnostics: &DiagnosticState) -> Self {
        if diagnostics.stop_scan() {
            AbortLevel::Scan
        } else if diagnostics.stop_parse() {
            AbortLevel::Parse
        } else if diagnostics.stop_load() {
            AbortLevel::Load
        } else {
            AbortLevel::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AbortLevel::None => "none",
            AbortLevel::Load => "load",
            AbortLevel::Parse => "parse",
            AbortLevel::Scan => "scan",
        }
    }
}

/// Result of one completed load
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub outcome: LoadOutcome,
    pub warnings: u32,
    pub errors: u32,
    pub abort_level: AbortLevel,
    pub limits: DiagnosticLimits,
    pub diagnostics: Vec<Diagnostic>,
    /// Successful sink mutations
    pub committed: usize,
    pub lines: u32,
    pub metrics: LexicalMetrics,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl LoadReport {
    pub(super) fn new(outcome: ParseOutcome, started_at: DateTime<Utc>, duration: Duration) -> Self {
        let ParseOutcome {
            diagnostics,
            committed,
            lines,
            metrics,
        } = outcome;

        let abort_level = AbortLevel::of(&diagnostics);
        let classification = match abort_level {
            AbortLevel::None if diagnostics.warnings() == 0 => LoadOutcome::FullyLoaded,
            AbortLevel::None => LoadOutcome::LoadedWithWarnings,
            _ if committed > 0 => LoadOutcome::AbortedWithPartialData,
            _ => LoadOutcome::AbortedWithNoData,
        };

        Self {
            outcome: classification,
            warnings: diagnostics.warnings(),
            errors: diagnostics.errors(),
            abort_level,
            limits: diagnostics.limits(),
            committed,
            lines,
            metrics,
            started_at,
            duration,
            diagnostics: diagnostics.into_records(),
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.abort_level != AbortLevel::None
    }

    /// One line per diagnostic, prefixed with its source line number
    pub fn listing(&self) -> String {
        let mut listing = String::new();
        for diagnostic in &self.diagnostics {
            listing.push_str(&diagnostic.render(self.limits.debug_level));
            listing.push('\n');
        }
        listing
    }

    pub(super) fn log_result(&self, source: &str) {
        if self.is_aborted() {
            log_error!(codes::limits::LOAD_ABORTED, "Database load aborted",
                "source" => source,
                "abort_level" => self.abort_level.as_str(),
                "warnings" => self.warnings,
                "errors" => self.errors,
                "committed" => self.committed
            );
        } else {
            log_success!(codes::success::LOAD_COMPLETE, "Database loaded",
                "source" => source,
                "warnings" => self.warnings,
                "lines" => self.lines,
                "tokens" => self.metrics.total_tokens,
                "duration_ms" => format!("{:.2}", self.duration.as_secs_f64() * 1000.0)
            );
        }
    }
}
