//! Grammar parser for the database S-expression
//!
//! Drives a [`TokenWindow`](crate::tokens::TokenWindow) through the root
//! form and its sections, handing declarations, cells and metadata to a
//! [`DatabaseSink`] as they are completed.

mod alist;
mod header;
mod parser;
mod query;
mod user;
mod values;

pub use alist::{Admission, AlistSchema, AlistTracker};
pub use parser::{OdbParser, ParseOutcome};
pub use values::column_predicate_args;

use crate::config::runtime::ParserPreferences;
use crate::diagnostics::{DiagnosticState, SystemResult};
use crate::lexical::Lexer;
use crate::logging::codes;
use crate::sink::DatabaseSink;
use crate::{log_debug, log_info};

/// Parse a whole database and drain the lexer afterwards
pub fn parse_database(
    lexer: Lexer<'_>,
    diag: DiagnosticState,
    sink: &mut dyn DatabaseSink,
    preferences: ParserPreferences,
    honor_header_limits: bool,
) -> SystemResult<ParseOutcome> {
    log_debug!("Starting syntax analysis",
        "max_warnings" => diag.limits().max_warnings,
        "max_errors" => diag.limits().max_errors
    );

    let mut parser =
        OdbParser::new(lexer, diag, sink, preferences)?.honor_header_limits(honor_header_limits);
    parser.parse_database()?;
    let outcome = parser.finish()?;

    log_info!("Syntax analysis finished",
        "warnings" => outcome.diagnostics.warnings(),
        "errors" => outcome.diagnostics.errors(),
        "committed" => outcome.committed,
        "lines" => outcome.lines
    );
    Ok(outcome)
}

/// Check that every code the parser records is registered
pub fn init_syntax_logging() -> Result<(), String> {
    let parser_codes = [
        codes::syntax::UNEXPECTED_TOKEN,
        codes::syntax::UNEXPECTED_EOF,
        codes::syntax::MISSING_REQUIRED_ENTRY,
        codes::syntax::MAX_PARSE_DEPTH_EXCEEDED,
        codes::syntax::MISSING_ALIST_VALUE,
        codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
        codes::syntax::EXCESS_ALIST_VALUES,
        codes::syntax::MISSING_RIGHT_PAREN,
        codes::syntax::DUPLICATE_ALIST_ENTRY,
        codes::syntax::UNKNOWN_ALIST_LABEL,
        codes::syntax::ALIST_ENTRY_OUT_OF_ORDER,
        codes::syntax::UNEXPECTED_LIST_ITEM,
        codes::syntax::TRAILING_CONTENT,
        codes::semantic::VALUE_TYPE_MISMATCH,
        codes::semantic::EXCESS_ARGS,
        codes::semantic::MISSING_ARGS,
        codes::semantic::UNKNOWN_PREDICATE,
        codes::semantic::UNKNOWN_COLUMN,
        codes::semantic::RESERVED_NOMINAL,
        codes::semantic::DUPLICATE_NAME,
        codes::semantic::INVALID_NAME,
        codes::semantic::DUPLICATE_FORMAL_ARG,
        codes::semantic::EMPTY_FORMAL_ARG_LIST,
        codes::semantic::FARG_NAME_MISMATCH,
        codes::semantic::UNKNOWN_TYPE,
        codes::semantic::VALUE_OUT_OF_RANGE,
        codes::semantic::TIME_OUT_OF_RANGE,
        codes::semantic::UNSUPPORTED_VERSION,
        codes::semantic::UNKNOWN_VOCAB_ENTRY,
        codes::semantic::TOO_MANY_FORMAL_ARGS,
        codes::semantic::INVALID_VARIABLE_LENGTH,
    ];

    for code in &parser_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    log_debug!("Syntax module logging validation completed", "codes" => parser_codes.len());
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_codes_registered() {
        assert!(init_syntax_logging().is_ok());
    }
}
