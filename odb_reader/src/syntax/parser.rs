//! Recursive-descent reader for the database S-expression
//!
//! The parser reads through a [`TokenWindow`] and never unwinds on bad
//! data: defects become warnings or errors in its [`DiagnosticState`], and
//! every production checks `halted()` before doing more work. Only
//! [`SystemError`] faults propagate through `?`.
//!
//! Productions live in sibling modules as further `impl` blocks:
//! `alist` (attribute lists), `header`, `user`, `query` (which also
//! handles `SYSTEM>`) and `values`.

use crate::config::compile_time::syntax::MAX_CONTEXT_STACK_DEPTH;
use crate::config::runtime::ParserPreferences;
use crate::diagnostics::{DiagnosticState, SystemError, SystemResult};
use crate::lexical::{Lexer, LexicalMetrics};
use crate::logging::{codes, Code};
use crate::sink::DatabaseSink;
use crate::tokens::{AlistLabel, Token, TokenWindow};
use crate::{log_debug, log_success};

use super::alist::AlistSchema;

/// Sections of the database body, in file order
const SECTIONS_SCHEMA: &AlistSchema = &[
    (AlistLabel::Header, true),
    (AlistLabel::User, true),
    (AlistLabel::Query, false),
    (AlistLabel::System, false),
];

/// Everything left once parsing and the final lexer drain are done
#[derive(Debug)]
pub struct ParseOutcome {
    pub diagnostics: DiagnosticState,
    /// Successful sink mutations
    pub committed: usize,
    pub lines: u32,
    pub metrics: LexicalMetrics,
}

pub struct OdbParser<'a, 's> {
    pub(super) window: TokenWindow<'a>,
    pub(super) diag: DiagnosticState,
    pub(super) sink: &'s mut dyn DatabaseSink,
    pub(super) preferences: ParserPreferences,
    pub(super) honor_header_limits: bool,
    /// Current predicate nesting
    pub(super) depth: usize,
    context_stack: Vec<&'static str>,
    committed: usize,
}

impl<'a, 's> OdbParser<'a, 's> {
    pub fn new(
        lexer: Lexer<'a>,
        mut diag: DiagnosticState,
        sink: &'s mut dyn DatabaseSink,
        preferences: ParserPreferences,
    ) -> SystemResult<Self> {
        let window = TokenWindow::new(lexer, &mut diag)?;
        Ok(Self {
            window,
            diag,
            sink,
            preferences,
            honor_header_limits: true,
            depth: 0,
            context_stack: Vec::new(),
            committed: 0,
        })
    }

    /// Whether `MAX-ERRORS>`, `MAX-WARNINGS>` and `DEBUG-LEVEL>` in the
    /// header replace the limits the load started with
    pub fn honor_header_limits(mut self, honor: bool) -> Self {
        self.honor_header_limits = honor;
        self
    }

    pub fn diagnostics(&self) -> &DiagnosticState {
        &self.diag
    }

    /// `( setf macshapa-db '( sections ) )` followed by end of input
    pub fn parse_database(&mut self) -> SystemResult<()> {
        self.push_context("database");

        let opened = self.expect(Token::is_left_paren, "'('")?
            && self.expect(|t| matches!(t, Token::Setf), "setf")?
            && self.expect(|t| matches!(t, Token::DbVar), "macshapa-db")?
            && self.expect(|t| matches!(t, Token::Quote), "quote mark")?;

        if opened {
            if self.token().is_left_paren() {
                self.parse_alist_body(SECTIONS_SCHEMA, |p, label| match label {
                    AlistLabel::Header => p.parse_header(),
                    AlistLabel::User => p.parse_user(),
                    AlistLabel::Query => p.parse_query(),
                    AlistLabel::System => p.parse_system(),
                    _ => p.discard_value(),
                })?;
            } else if !self.halted() {
                self.unexpected("'(' opening the section list");
            }

            if self.expect(Token::is_right_paren, "')' closing the database")?
                && !self.token().is_eof()
            {
                let found = self.token().to_string();
                self.warn(codes::syntax::TRAILING_CONTENT, &found);
            }
        }

        self.pop_context();
        Ok(())
    }

    /// Scan any input the grammar did not reach, then hand back the state
    pub fn finish(mut self) -> SystemResult<ParseOutcome> {
        self.window.drain(&mut self.diag)?;
        let lines = self.window.lexer().lines_read();
        let metrics = self.window.lexer().metrics().clone();
        Ok(ParseOutcome {
            diagnostics: self.diag,
            committed: self.committed,
            lines,
            metrics,
        })
    }

    // ------------------------------------------------------------------
    // window access
    // ------------------------------------------------------------------

    pub(super) fn token(&self) -> &Token {
        self.window.token()
    }

    pub(super) fn peek1(&self) -> &Token {
        self.window.lookahead1()
    }

    pub(super) fn line(&self) -> u32 {
        self.window.line()
    }

    pub(super) fn advance(&mut self) -> SystemResult<()> {
        self.window.advance(&mut self.diag)
    }

    pub(super) fn halted(&self) -> bool {
        self.diag.stop_parse()
    }

    /// Current token is `(` and the next one is an attribute label
    pub(super) fn at_entry(&self) -> bool {
        self.token().is_left_paren() && self.peek1().is_label()
    }

    /// Current token can start a value
    pub(super) fn at_value(&self) -> bool {
        !self.token().is_right_paren() && !self.token().is_eof()
    }

    /// Consume the current token if it satisfies `wanted`, otherwise
    /// record a parse-fatal error
    pub(super) fn expect(
        &mut self,
        wanted: fn(&Token) -> bool,
        description: &str,
    ) -> SystemResult<bool> {
        if self.halted() {
            return Ok(false);
        }
        if wanted(self.token()) {
            self.advance()?;
            Ok(true)
        } else {
            self.unexpected(description);
            Ok(false)
        }
    }

    // ------------------------------------------------------------------
    // diagnostics
    // ------------------------------------------------------------------

    pub(super) fn warn(&mut self, code: Code, extra: &str) {
        let line = self.line();
        self.diag.warn(code, line, extra);
    }

    /// Error that stops parsing but lets the lexer run on
    pub(super) fn fatal(&mut self, code: Code, extra: &str) {
        let line = self.line();
        self.diag.error(code, line, extra, false, true);
    }

    /// Error that stops loading only
    pub(super) fn load_error(&mut self, code: Code, extra: &str) {
        let line = self.line();
        self.diag.error(code, line, extra, false, false);
    }

    pub(super) fn unexpected(&mut self, expected: &str) {
        let context = self.context_path();
        match self.token() {
            Token::Eof => self.fatal(
                codes::syntax::UNEXPECTED_EOF,
                &format!("expected {} in {}", expected, context),
            ),
            // already reported by the lexer
            Token::Error { .. } => {}
            other => {
                let found = other.to_string();
                self.fatal(
                    codes::syntax::UNEXPECTED_TOKEN,
                    &format!("expected {} in {}, found {}", expected, context, found),
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // recovery
    // ------------------------------------------------------------------

    /// Skip one atom, or one balanced list. Never consumes a `)` that
    /// closes the enclosing list.
    pub(super) fn skip_item(&mut self) -> SystemResult<()> {
        match self.token() {
            Token::RightParen | Token::Eof => Ok(()),
            Token::LeftParen => {
                let mut depth = 0usize;
                loop {
                    if self.halted() {
                        return Ok(());
                    }
                    match self.token() {
                        Token::LeftParen => depth += 1,
                        Token::RightParen => depth -= 1,
                        Token::Eof => {
                            self.unexpected("')'");
                            return Ok(());
                        }
                        _ => {}
                    }
                    self.advance()?;
                    if depth == 0 {
                        return Ok(());
                    }
                }
            }
            _ => self.advance(),
        }
    }

    /// Skip items up to, not including, the closing `)`
    pub(super) fn discard_value(&mut self) -> SystemResult<()> {
        while !self.halted() && self.at_value() {
            self.skip_item()?;
        }
        Ok(())
    }

    /// Skip the rest of a list including its closing `)`
    pub(super) fn drain_list(&mut self) -> SystemResult<()> {
        self.discard_value()?;
        if self.halted() {
            return Ok(());
        }
        if self.token().is_right_paren() {
            self.advance()
        } else {
            self.unexpected("')'");
            Ok(())
        }
    }

    /// Close an attribute entry after its value. Extra values are drained
    /// with one warning; a following entry with no `)` in between is taken
    /// as a forgotten paren.
    pub(super) fn close_entry(&mut self) -> SystemResult<()> {
        let mut warned = false;
        loop {
            if self.halted() {
                return Ok(());
            }
            if self.token().is_right_paren() {
                return self.advance();
            }
            if self.at_entry() {
                self.warn(codes::syntax::MISSING_RIGHT_PAREN, &self.context_path());
                return Ok(());
            }
            if self.token().is_eof() {
                self.unexpected("')'");
                return Ok(());
            }
            if !warned {
                let found = self.token().to_string();
                self.warn(codes::syntax::EXCESS_ALIST_VALUES, &found);
                warned = true;
            }
            self.skip_item()?;
        }
    }

    // ------------------------------------------------------------------
    // sink access
    // ------------------------------------------------------------------

    /// Data may still be committed
    pub(super) fn loading(&self) -> bool {
        !self.diag.stop_load()
    }

    /// Apply one sink mutation. Callers check `loading()` first; reaching
    /// here after loading stopped is a fault.
    pub(super) fn commit<T>(
        &mut self,
        operation: &'static str,
        apply: impl FnOnce(&mut dyn DatabaseSink) -> SystemResult<T>,
    ) -> SystemResult<T> {
        if self.diag.stop_load() {
            return Err(SystemError::MutationAfterStopLoad { operation });
        }
        let result = apply(&mut *self.sink)?;
        self.committed += 1;
        Ok(result)
    }

    // ------------------------------------------------------------------
    // context
    // ------------------------------------------------------------------

    pub(super) fn push_context(&mut self, context: &'static str) {
        if self.context_stack.len() < MAX_CONTEXT_STACK_DEPTH {
            self.context_stack.push(context);
        }
        log_debug!("Entering", "context" => context, "line" => self.line());
    }

    pub(super) fn pop_context(&mut self) {
        self.context_stack.pop();
    }

    pub(super) fn context_path(&self) -> String {
        self.context_stack.join("/")
    }

    pub(super) fn section_done(&self, label: AlistLabel) {
        if self.preferences.log_section_progress {
            log_success!(codes::success::SECTION_PARSED, "Section parsed",
                "section" => label.as_str(),
                "line" => self.line(),
                "warnings" => self.diag.warnings(),
                "errors" => self.diag.errors()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{parse, parse_with_limits};
    use crate::logging::codes;

    const MINIMAL: &str = "( setf macshapa-db '( (HEADER> (VERSION> 1)) (USER> ()) (QUERY> ()) (SYSTEM> ()) ) )";

    #[test]
    fn test_minimal_database_parses_cleanly() {
        let (db, diag) = parse(MINIMAL);
        assert_eq!(diag.errors(), 0);
        assert_eq!(diag.warnings(), 0);
        assert!(!diag.stop_load());
        assert_eq!(db.header().map(|h| h.version), Some(1));
    }

    #[test]
    fn test_query_and_system_sections_are_optional() {
        let (_, diag) = parse("( setf macshapa-db '( (HEADER> (VERSION> 1)) (USER> ()) ) )");
        assert_eq!(diag.errors(), 0);
    }

    #[test]
    fn test_missing_user_section_is_load_error() {
        let (_, diag) = parse("( setf macshapa-db '( (HEADER> (VERSION> 1)) ) )");
        assert_eq!(diag.count_of(codes::syntax::MISSING_REQUIRED_ENTRY), 1);
        assert!(diag.stop_load());
        assert!(!diag.stop_parse());
    }

    #[test]
    fn test_wrong_outer_form_is_parse_fatal() {
        let (_, diag) = parse("( macshapa-db '( ) )");
        assert_eq!(diag.count_of(codes::syntax::UNEXPECTED_TOKEN), 1);
        assert!(diag.stop_parse());
    }

    #[test]
    fn test_truncated_file_reports_eof() {
        let (_, diag) = parse("( setf macshapa-db '( (HEADER> (VERSION> 1))");
        assert!(diag.count_of(codes::syntax::UNEXPECTED_EOF) >= 1);
        assert!(diag.stop_parse());
    }

    #[test]
    fn test_trailing_content_warns_once() {
        let input = format!("{} ( |extra| )", MINIMAL);
        let (_, diag) = parse(&input);
        assert_eq!(diag.count_of(codes::syntax::TRAILING_CONTENT), 1);
        assert_eq!(diag.errors(), 0);
    }

    #[test]
    fn test_sections_out_of_order() {
        let (_, diag) = parse_with_limits(
            "( setf macshapa-db '( (USER> ()) (HEADER> (VERSION> 1)) ) )",
            99,
            10,
        );
        assert_eq!(diag.count_of(codes::syntax::MISSING_REQUIRED_ENTRY), 1);
        assert_eq!(diag.count_of(codes::syntax::ALIST_ENTRY_OUT_OF_ORDER), 1);
    }

    #[test]
    fn test_unknown_section_label_discarded() {
        let input = "( setf macshapa-db '( (HEADER> (VERSION> 1)) (USER> ()) (EXTRA> (1 2 3)) ) )";
        let (_, diag) = parse(input);
        assert_eq!(diag.count_of(codes::syntax::UNKNOWN_ALIST_LABEL), 1);
        assert_eq!(diag.errors(), 0);
    }

    #[test]
    fn test_lexical_error_stops_parse_but_not_scan() {
        let input = "( setf macshapa-db '( (HEADER> (VERSION> 1)) # (USER> ()) ) ) ||";
        let (_, diag) = parse(input);
        assert!(diag.stop_parse());
        assert!(!diag.stop_scan());
        // the drain still reaches the second lexical error
        assert_eq!(diag.count_of(codes::lexical::UNKNOWN_TOKEN), 1);
        assert_eq!(diag.count_of(codes::lexical::ZERO_LENGTH_SYMBOL), 1);
    }
}
