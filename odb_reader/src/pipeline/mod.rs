//! Load driver
//!
//! Wires file reading, the lexer, the grammar parser and a database sink
//! together and turns the final diagnostic state into a [`LoadReport`].

mod error;
mod result;
mod validation;

pub use error::PipelineError;
pub use result::{AbortLevel, LoadOutcome, LoadReport};
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::diagnostics::{DiagnosticLimits, DiagnosticState};
use crate::lexical::Lexer;
use crate::logging;
use crate::sink::DatabaseSink;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;

/// Load a database from raw bytes into `sink`
pub fn load_bytes(
    bytes: &[u8],
    sink: &mut dyn DatabaseSink,
    config: &RuntimeConfig,
) -> Result<LoadReport, PipelineError> {
    load_source(bytes, "<memory>", sink, config)
}

pub fn load_str(
    text: &str,
    sink: &mut dyn DatabaseSink,
    config: &RuntimeConfig,
) -> Result<LoadReport, PipelineError> {
    load_bytes(text.as_bytes(), sink, config)
}

/// Read `path` and load it into `sink`
pub fn load_file(
    path: &Path,
    sink: &mut dyn DatabaseSink,
    config: &RuntimeConfig,
) -> Result<LoadReport, PipelineError> {
    logging::with_file_context(path.to_path_buf(), 0, || {
        crate::log_info!("Starting database load", "file" => path.display());
        let contents = crate::file_processor::read_file(path, &config.file_processor)?;
        load_source(
            &contents.bytes,
            &path.display().to_string(),
            sink,
            config,
        )
    })
}

fn load_source(
    bytes: &[u8],
    source: &str,
    sink: &mut dyn DatabaseSink,
    config: &RuntimeConfig,
) -> Result<LoadReport, PipelineError> {
    let started_at = Utc::now();
    let start = Instant::now();

    let diag = DiagnosticState::new(DiagnosticLimits::from_preferences(&config.reader));
    let lexer = Lexer::with_preferences(bytes, config.lexical.clone());
    let outcome = crate::syntax::parse_database(
        lexer,
        diag,
        sink,
        config.parser.clone(),
        config.reader.honor_header_limits,
    )?;

    let report = LoadReport::new(outcome, started_at, start.elapsed());
    report.log_result(source);
    Ok(report)
}
