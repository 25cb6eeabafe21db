//! Reader for MacSHAPA Open Database files
//!
//! Bytes go through the lexer and a two-token window into a recursive-descent
//! parser, which hands predicates, columns, cells and header data to a
//! [`DatabaseSink`] while recording diagnostics. See [`pipeline`] for the
//! entry points.

pub mod config;
pub mod diagnostics;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod semantic;
pub mod sink;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use diagnostics::{Diagnostic, DiagnosticLimits, DiagnosticState, SystemError};
pub use pipeline::{load_bytes, load_file, load_str, AbortLevel, LoadOutcome, LoadReport, PipelineError};
pub use sink::{DatabaseSink, DatabaseSummary, MemoryDatabase};
