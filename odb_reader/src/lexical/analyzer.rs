//! Lexer for the Open Database format
//!
//! Pulls characters from a `CharSource` one token at a time. Recoverable
//! defects are recorded as warnings and patched in the token text; fatal
//! defects are recorded as errors and yield `Token::Error`. End of input in
//! the middle of a token stops scanning altogether.

use super::source::CharSource;
use crate::config::compile_time::lexical::MAX_TOKEN_LENGTH;
use crate::config::constants::format::{
    DB_VAR_WORD, FALSE_WORD, FLOAT_CEILING, FLOAT_FLOOR, MAX_INTEGER, MIN_INTEGER, SETF_WORD,
    TRUE_WORD,
};
use crate::config::runtime::LexicalPreferences;
use crate::diagnostics::{DiagnosticState, SystemError};
use crate::log_debug;
use crate::logging::{codes, Code};
use crate::tokens::{AlistLabel, PrivateValue, StringFlags, SymbolFlags, Token};
use crate::utils::{Position, Span, Spanned};
use serde::Serialize;

/// Token counts for one load
#[derive(Debug, Default, Clone, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub symbols: usize,
    pub numbers: usize,
    pub strings: usize,
    pub labels: usize,
    pub error_tokens: usize,
    pub comments: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;
        match token {
            Token::Symbol { .. } => self.symbols += 1,
            Token::Integer { .. } | Token::Float { .. } => self.numbers += 1,
            Token::Str { .. } => self.strings += 1,
            Token::Label { .. } => self.labels += 1,
            Token::Error { .. } => self.error_tokens += 1,
            _ => {}
        }
    }
}

/// Digit-by-digit number accumulation with the format's overflow sentinels
#[derive(Debug, Default)]
struct NumberAccumulator {
    int_part: f64,
    frac_part: f64,
    weight: f64,
    digits: usize,
    is_float: bool,
    int_discarded: bool,
    frac_discarded: bool,
}

impl NumberAccumulator {
    fn new() -> Self {
        Self {
            weight: 0.1,
            ..Self::default()
        }
    }

    fn start_fraction(&mut self) {
        self.is_float = true;
    }

    /// Adds one digit; returns a warning code the first time digits are dropped
    fn push_digit(&mut self, digit: u32) -> Option<Code> {
        self.digits += 1;
        if !self.is_float {
            if self.int_part > FLOAT_CEILING {
                if !self.int_discarded {
                    self.int_discarded = true;
                    return Some(codes::lexical::INTEGER_DIGITS_DISCARDED);
                }
            } else {
                self.int_part = self.int_part * 10.0 + f64::from(digit);
            }
        } else if self.weight < FLOAT_FLOOR {
            if !self.frac_discarded {
                self.frac_discarded = true;
                return Some(codes::lexical::FRACTION_DIGITS_DISCARDED);
            }
        } else {
            self.frac_part += f64::from(digit) * self.weight;
            self.weight /= 10.0;
        }
        None
    }

    fn value(&self, negative: bool) -> f64 {
        let magnitude = self.int_part + self.frac_part;
        if negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

fn is_control(ch: char) -> bool {
    ch < ' ' || ch == '\u{7f}'
}

pub struct Lexer<'a> {
    source: CharSource<'a>,
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
    /// Line the token being scanned started on
    token_line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_preferences(input, LexicalPreferences::default())
    }

    pub fn with_preferences(input: &'a [u8], preferences: LexicalPreferences) -> Self {
        Self {
            source: CharSource::new(input),
            preferences,
            metrics: LexicalMetrics::default(),
            token_line: 1,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn line(&self) -> u32 {
        self.source.line()
    }

    pub fn position(&self) -> Position {
        self.source.position()
    }

    pub fn lines_read(&self) -> u32 {
        self.source.lines_read()
    }

    /// Scan the next token. Calling this once scanning has stopped is a fault.
    pub fn next_token(
        &mut self,
        diag: &mut DiagnosticState,
    ) -> Result<Spanned<Token>, SystemError> {
        if diag.stop_scan() {
            return Err(SystemError::LexerAfterStopScan {
                line: self.source.line(),
            });
        }

        self.skip_whitespace_and_comments();

        let start = self.source.position();
        self.token_line = start.line;
        let token = match self.source.next() {
            None => Token::Eof,
            Some(ch) => self.scan(ch, diag),
        };
        let end = self.source.position();

        self.metrics.record_token(&token);
        if self.preferences.trace_tokens {
            log_debug!("Token scanned",
                "kind" => token.kind_name(),
                "text" => &token,
                "line" => start.line
            );
        }

        Ok(Spanned::new(token, Span::new(start, end)))
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.source.peek() {
                Some(';') => {
                    self.metrics.comments += 1;
                    while let Some(ch) = self.source.next() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                Some(ch) if ch <= ' ' => {
                    self.source.next();
                }
                _ => break,
            }
        }
    }

    fn scan(&mut self, first: char, diag: &mut DiagnosticState) -> Token {
        match first {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '\'' => Token::Quote,
            '|' => self.scan_symbol(diag),
            '"' => self.scan_string(diag),
            '+' | '-' | '.' | '0'..='9' => self.scan_number(first, diag),
            '<' => self.scan_private_value(diag),
            'A'..='Z' => self.scan_upper(first, diag),
            'a'..='z' => self.scan_lower(first, diag),
            other => self.fail(
                diag,
                codes::lexical::UNKNOWN_TOKEN,
                &other.escape_default().to_string(),
                false,
            ),
        }
    }

    // ------------------------------------------------------------------
    // failure helpers
    // ------------------------------------------------------------------

    fn fail(&mut self, diag: &mut DiagnosticState, code: Code, text: &str, scan_fatal: bool) -> Token {
        diag.error(code, self.token_line, text, scan_fatal, true);
        Token::Error {
            text: text.to_string(),
        }
    }

    fn eof_in(&mut self, diag: &mut DiagnosticState, context: &str, text: &str) -> Token {
        diag.error(
            codes::lexical::UNEXPECTED_EOF_IN_TOKEN,
            self.token_line,
            &format!("inside {} '{}'", context, text),
            true,
            true,
        );
        Token::Error {
            text: text.to_string(),
        }
    }

    fn too_long(&mut self, diag: &mut DiagnosticState, text: &str) -> Token {
        let prefix: String = text.chars().take(32).collect();
        diag.error(
            codes::lexical::TOKEN_TOO_LONG,
            self.token_line,
            &format!("{}... exceeds {} bytes", prefix, MAX_TOKEN_LENGTH),
            true,
            true,
        );
        Token::Error { text: prefix }
    }

    // ------------------------------------------------------------------
    // symbols
    // ------------------------------------------------------------------

    /// Handles the character after a `\` inside a symbol. Returns the token
    /// to yield instead when the escape is fatal.
    fn symbol_escape(
        &mut self,
        diag: &mut DiagnosticState,
        text: &mut String,
        flags: &mut SymbolFlags,
    ) -> Option<Token> {
        match self.source.next() {
            None => Some(self.eof_in(diag, "symbol", text)),
            Some('\n') => Some(self.fail(diag, codes::lexical::NEWLINE_IN_SYMBOL, text, false)),
            Some(escaped @ ('|' | '\\')) => {
                text.push(escaped);
                flags.clear(SymbolFlags::PREDICATE | SymbolFlags::COLUMN);
                None
            }
            Some(other) => {
                diag.warn(
                    codes::lexical::ILLEGAL_SYMBOL_ESCAPE,
                    self.token_line,
                    &format!("\\{}", other.escape_default()),
                );
                text.push('_');
                None
            }
        }
    }

    fn illegal_symbol_char(&mut self, diag: &mut DiagnosticState, text: &mut String, ch: char) {
        diag.warn(
            codes::lexical::ILLEGAL_SYMBOL_CHAR,
            self.token_line,
            &format!("'{}'", ch.escape_default()),
        );
        text.push('_');
    }

    fn scan_symbol(&mut self, diag: &mut DiagnosticState) -> Token {
        let mut text = String::new();

        match self.source.peek() {
            None => return self.eof_in(diag, "symbol", &text),
            Some('|') => {
                self.source.next();
                return self.fail(diag, codes::lexical::ZERO_LENGTH_SYMBOL, "||", false);
            }
            Some('<') => return self.scan_formal_arg(diag),
            Some(_) => {}
        }

        let mut flags = SymbolFlags::names();
        loop {
            let ch = match self.source.next() {
                Some(ch) => ch,
                None => return self.eof_in(diag, "symbol", &text),
            };
            match ch {
                '|' => break,
                '\n' => {
                    return self.fail(diag, codes::lexical::NEWLINE_IN_SYMBOL, &text, false)
                }
                '\\' => {
                    if let Some(fatal) = self.symbol_escape(diag, &mut text, &mut flags) {
                        return fatal;
                    }
                }
                ' ' | ':' => {
                    text.push(ch);
                    flags.clear(SymbolFlags::PREDICATE | SymbolFlags::COLUMN);
                }
                '(' | ')' | '"' | '\'' | ',' | '<' | '>' => {
                    self.illegal_symbol_char(diag, &mut text, ch)
                }
                c if is_control(c) => self.illegal_symbol_char(diag, &mut text, c),
                c => text.push(c),
            }
            if text.len() > MAX_TOKEN_LENGTH {
                return self.too_long(diag, &text);
            }
        }

        if text.starts_with(' ') || text.ends_with(' ') {
            flags.clear(SymbolFlags::NOMINAL);
        }

        Token::Symbol { text, flags }
    }

    /// `|<name>|`; the opening `<` has not been consumed yet
    fn scan_formal_arg(&mut self, diag: &mut DiagnosticState) -> Token {
        let mut text = String::new();
        let mut flags = SymbolFlags::formal_arg();
        self.source.next();
        text.push('<');

        loop {
            let ch = match self.source.next() {
                Some(ch) => ch,
                None => return self.eof_in(diag, "formal argument", &text),
            };
            match ch {
                '>' => {
                    text.push('>');
                    match self.source.peek() {
                        Some('|') => {
                            self.source.next();
                            break;
                        }
                        None => return self.eof_in(diag, "formal argument", &text),
                        Some(_) => {
                            return self.fail(
                                diag,
                                codes::lexical::UNTERMINATED_FORMAL_ARG,
                                &text,
                                false,
                            )
                        }
                    }
                }
                '|' => {
                    return self.fail(diag, codes::lexical::UNTERMINATED_FORMAL_ARG, &text, false)
                }
                '\n' => {
                    return self.fail(diag, codes::lexical::NEWLINE_IN_SYMBOL, &text, false)
                }
                '\\' => {
                    if let Some(fatal) = self.symbol_escape(diag, &mut text, &mut flags) {
                        return fatal;
                    }
                }
                '(' | ')' | '"' | '\'' | ',' | '<' => self.illegal_symbol_char(diag, &mut text, ch),
                c if is_control(c) => self.illegal_symbol_char(diag, &mut text, c),
                c => text.push(c),
            }
            if text.len() > MAX_TOKEN_LENGTH {
                return self.too_long(diag, &text);
            }
        }

        if text == "<>" {
            return self.fail(diag, codes::lexical::ZERO_LENGTH_SYMBOL, "|<>|", false);
        }

        Token::Symbol { text, flags }
    }

    // ------------------------------------------------------------------
    // strings
    // ------------------------------------------------------------------

    fn scan_string(&mut self, diag: &mut DiagnosticState) -> Token {
        let mut text = String::new();
        let mut flags = StringFlags::all();

        loop {
            let ch = match self.source.next() {
                Some(ch) => ch,
                None => return self.eof_in(diag, "string", &text),
            };
            match ch {
                '"' => break,
                '\\' => match self.source.next() {
                    None => return self.eof_in(diag, "string", &text),
                    Some('\\') => text.push('\\'),
                    Some('"') => {
                        text.push('"');
                        flags.clear(StringFlags::QUOTE_STRING);
                    }
                    Some(other) => {
                        diag.warn(
                            codes::lexical::ILLEGAL_STRING_ESCAPE,
                            self.token_line,
                            &format!("\\{}", other.escape_default()),
                        );
                        text.push('_');
                    }
                },
                '\u{8}' => {
                    diag.warn(codes::lexical::BACKSPACE_IN_STRING, self.token_line, "");
                    text.push('_');
                }
                c if is_control(c) => {
                    text.push(c);
                    flags.clear(StringFlags::QUOTE_STRING);
                }
                c => text.push(c),
            }
            if text.len() > MAX_TOKEN_LENGTH {
                return self.too_long(diag, &text);
            }
        }

        if text.chars().all(char::is_whitespace) {
            flags.clear(StringFlags::NON_BLANK);
        }

        Token::Str { text, flags }
    }

    // ------------------------------------------------------------------
    // numbers
    // ------------------------------------------------------------------

    fn scan_number(&mut self, first: char, diag: &mut DiagnosticState) -> Token {
        let mut text = String::new();
        let mut number = NumberAccumulator::new();
        let negative = first == '-';

        let mut next = Some(first);
        while let Some(ch) = next {
            match ch {
                '+' | '-' if text.is_empty() => {}
                '.' if !number.is_float => number.start_fraction(),
                '0'..='9' => {
                    let digit = ch.to_digit(10).unwrap_or(0);
                    if let Some(code) = number.push_digit(digit) {
                        diag.warn(code, self.token_line, &text);
                    }
                }
                _ => break,
            }
            text.push(ch);
            if text.len() > MAX_TOKEN_LENGTH {
                return self.too_long(diag, &text);
            }

            next = match self.source.peek() {
                Some(c) if c.is_ascii_digit() || (c == '.' && !number.is_float) => {
                    self.source.next();
                    Some(c)
                }
                _ => None,
            };
        }

        if number.digits == 0 {
            return self.fail(diag, codes::lexical::NUMBER_WITHOUT_DIGITS, &text, false);
        }

        let value = number.value(negative);
        if number.is_float {
            return Token::Float { text, value };
        }

        if value > MAX_INTEGER || value < MIN_INTEGER {
            let clamped = value.clamp(MIN_INTEGER, MAX_INTEGER);
            diag.warn(codes::lexical::INTEGER_OUT_OF_RANGE, self.token_line, &text);
            return Token::Integer {
                text: format!("{}", clamped as i64),
                value: clamped,
            };
        }

        Token::Integer { text, value }
    }

    // ------------------------------------------------------------------
    // words
    // ------------------------------------------------------------------

    fn scan_upper(&mut self, first: char, diag: &mut DiagnosticState) -> Token {
        let mut text = String::from(first);

        while let Some(ch) = self.source.peek() {
            if ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '-' || ch == '_' {
                self.source.next();
                text.push(ch);
                if text.len() > MAX_TOKEN_LENGTH {
                    return self.too_long(diag, &text);
                }
            } else {
                break;
            }
        }

        if self.source.peek() == Some('>') {
            self.source.next();
            text.push('>');
            let label = AlistLabel::lookup(&text);
            return Token::Label { text, label };
        }

        match text.as_str() {
            TRUE_WORD => Token::Boolean(true),
            FALSE_WORD => Token::Boolean(false),
            _ => self.fail(diag, codes::lexical::UNKNOWN_TOKEN, &text, false),
        }
    }

    fn scan_lower(&mut self, first: char, diag: &mut DiagnosticState) -> Token {
        let mut text = String::from(first);

        while let Some(ch) = self.source.peek() {
            if ch.is_ascii_lowercase() || ch == '-' {
                self.source.next();
                text.push(ch);
                if text.len() > MAX_TOKEN_LENGTH {
                    return self.too_long(diag, &text);
                }
            } else {
                break;
            }
        }

        match text.as_str() {
            SETF_WORD => Token::Setf,
            DB_VAR_WORD => Token::DbVar,
            _ => self.fail(diag, codes::lexical::UNKNOWN_TOKEN, &text, false),
        }
    }

    /// `<<NAME>>`; the first `<` has been consumed
    fn scan_private_value(&mut self, diag: &mut DiagnosticState) -> Token {
        let mut text = String::from("<");

        match self.source.peek() {
            Some('<') => {
                self.source.next();
                text.push('<');
            }
            None => return self.eof_in(diag, "private value", &text),
            Some(_) => {
                return self.fail(diag, codes::lexical::MALFORMED_PRIVATE_VALUE, &text, false)
            }
        }

        let body_start = text.len();
        while let Some(ch) = self.source.peek() {
            if ch.is_ascii_uppercase() || ch == '-' {
                self.source.next();
                text.push(ch);
                if text.len() > MAX_TOKEN_LENGTH {
                    return self.too_long(diag, &text);
                }
            } else {
                break;
            }
        }
        if text.len() == body_start {
            if self.source.at_eof() {
                return self.eof_in(diag, "private value", &text);
            }
            return self.fail(diag, codes::lexical::MALFORMED_PRIVATE_VALUE, &text, false);
        }

        for _ in 0..2 {
            match self.source.peek() {
                Some('>') => {
                    self.source.next();
                    text.push('>');
                }
                None => return self.eof_in(diag, "private value", &text),
                Some(_) => {
                    return self.fail(diag, codes::lexical::MALFORMED_PRIVATE_VALUE, &text, false)
                }
            }
        }

        let value = PrivateValue::lookup(&text);
        Token::PrivateValue { text, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticLimits;
    use assert_matches::assert_matches;

    fn roomy() -> DiagnosticState {
        DiagnosticState::new(DiagnosticLimits::new(99, 10, 0))
    }

    fn lex_all(input: &str) -> (Vec<Token>, DiagnosticState) {
        let mut diag = roomy();
        let mut lexer = Lexer::new(input.as_bytes());
        let mut tokens = Vec::new();
        while !diag.stop_scan() {
            let token = lexer.next_token(&mut diag).unwrap().into_inner();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, diag)
    }

    fn lex_one(input: &str) -> (Token, DiagnosticState) {
        let (mut tokens, diag) = lex_all(input);
        (tokens.remove(0), diag)
    }

    #[test]
    fn test_punctuation_and_reserved_words() {
        let (tokens, diag) = lex_all("( setf macshapa-db '( ) )");
        assert_eq!(
            tokens,
            vec![
                Token::LeftParen,
                Token::Setf,
                Token::DbVar,
                Token::Quote,
                Token::LeftParen,
                Token::RightParen,
                Token::RightParen,
                Token::Eof,
            ]
        );
        assert_eq!(diag.errors(), 0);
    }

    #[test]
    fn test_comments_are_skipped() {
        let (tokens, _) = lex_all("; header comment\r( ; trailing\r)");
        assert_eq!(tokens, vec![Token::LeftParen, Token::RightParen, Token::Eof]);
    }

    #[test]
    fn test_plain_symbol_has_all_name_classifications() {
        let (token, diag) = lex_one("|foo|");
        assert_matches!(token, Token::Symbol { ref text, flags } => {
            assert_eq!(text, "foo");
            assert!(flags.could_be_predicate());
            assert!(flags.could_be_column());
            assert!(flags.could_be_nominal());
            assert!(!flags.is_formal_arg());
        });
        assert_eq!(diag.warnings(), 0);
    }

    #[test]
    fn test_formal_arg_symbol_only_formal_arg() {
        let (token, _) = lex_one("|<ord>|");
        assert_matches!(token, Token::Symbol { ref text, flags } => {
            assert_eq!(text, "<ord>");
            assert!(flags.is_formal_arg());
            assert!(!flags.could_be_predicate());
            assert!(!flags.could_be_nominal());
        });
    }

    #[test]
    fn test_symbol_escapes_and_blanks_narrow_classification() {
        let (token, diag) = lex_one(r"|a\|b|");
        assert_matches!(token, Token::Symbol { ref text, flags } => {
            assert_eq!(text, "a|b");
            assert!(!flags.could_be_predicate());
            assert!(flags.could_be_nominal());
        });
        assert_eq!(diag.warnings(), 0);

        let (token, _) = lex_one("| padded|");
        assert_matches!(token, Token::Symbol { flags, .. } => {
            assert!(!flags.could_be_nominal());
            assert!(!flags.could_be_column());
        });
    }

    #[test]
    fn test_illegal_symbol_characters_replaced() {
        let (token, diag) = lex_one("|a(b,c|");
        assert_matches!(token, Token::Symbol { ref text, .. } => assert_eq!(text, "a_b_c"));
        assert_eq!(diag.count_of(codes::lexical::ILLEGAL_SYMBOL_CHAR), 2);

        let (token, diag) = lex_one(r"|a\qb|");
        assert_matches!(token, Token::Symbol { ref text, .. } => assert_eq!(text, "a_b"));
        assert_eq!(diag.count_of(codes::lexical::ILLEGAL_SYMBOL_ESCAPE), 1);
    }

    #[test]
    fn test_fatal_symbol_errors() {
        let (token, diag) = lex_one("||");
        assert_matches!(token, Token::Error { .. });
        assert_eq!(diag.count_of(codes::lexical::ZERO_LENGTH_SYMBOL), 1);
        assert!(diag.stop_parse());
        assert!(!diag.stop_scan());

        let (token, diag) = lex_one("|ab\rcd|");
        assert_matches!(token, Token::Error { .. });
        assert_eq!(diag.count_of(codes::lexical::NEWLINE_IN_SYMBOL), 1);

        let (token, diag) = lex_one("|<ab>c|");
        assert_matches!(token, Token::Error { .. });
        assert_eq!(diag.count_of(codes::lexical::UNTERMINATED_FORMAL_ARG), 1);
    }

    #[test]
    fn test_eof_inside_token_stops_scanning() {
        for input in ["|abc", "\"abc", "<<FLO", "|<ab"] {
            let (token, diag) = lex_one(input);
            assert_matches!(token, Token::Error { .. });
            assert_eq!(diag.count_of(codes::lexical::UNEXPECTED_EOF_IN_TOKEN), 1, "{}", input);
            assert!(diag.stop_scan());
        }
    }

    #[test]
    fn test_lexer_faults_after_stop_scan() {
        let mut diag = roomy();
        let mut lexer = Lexer::new(b"\"open");
        lexer.next_token(&mut diag).unwrap();
        assert!(diag.stop_scan());
        assert_matches!(
            lexer.next_token(&mut diag),
            Err(SystemError::LexerAfterStopScan { .. })
        );
    }

    #[test]
    fn test_string_classifications() {
        let (token, _) = lex_one("\"hello world\"");
        assert_matches!(token, Token::Str { ref text, flags } => {
            assert_eq!(text, "hello world");
            assert!(flags.could_be_quote_string());
            assert!(flags.could_be_text());
            assert!(flags.is_non_blank());
        });

        let (token, _) = lex_one(r#""say \"hi\"""#);
        assert_matches!(token, Token::Str { ref text, flags } => {
            assert_eq!(text, "say \"hi\"");
            assert!(!flags.could_be_quote_string());
            assert!(flags.could_be_text());
        });

        let (token, _) = lex_one("\"line one\rline two\"");
        assert_matches!(token, Token::Str { ref text, flags } => {
            assert_eq!(text, "line one\nline two");
            assert!(!flags.could_be_quote_string());
        });

        let (token, _) = lex_one("\"   \"");
        assert_matches!(token, Token::Str { flags, .. } => assert!(!flags.is_non_blank()));
    }

    #[test]
    fn test_string_escape_and_backspace_warnings() {
        let (token, diag) = lex_one("\"a\\tb\u{8}c\"");
        assert_matches!(token, Token::Str { ref text, .. } => assert_eq!(text, "a_b_c"));
        assert_eq!(diag.count_of(codes::lexical::ILLEGAL_STRING_ESCAPE), 1);
        assert_eq!(diag.count_of(codes::lexical::BACKSPACE_IN_STRING), 1);
    }

    #[test]
    fn test_numbers() {
        let (token, _) = lex_one("42");
        assert_matches!(token, Token::Integer { value, .. } => assert_eq!(value, 42.0));

        let (token, _) = lex_one("-17");
        assert_matches!(token, Token::Integer { value, .. } => assert_eq!(value, -17.0));

        let (token, _) = lex_one("3.25");
        assert_matches!(token, Token::Float { value, .. } => assert!((value - 3.25).abs() < 1e-12));

        let (token, _) = lex_one("-.5");
        assert_matches!(token, Token::Float { value, .. } => assert!((value + 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_number_without_digits_is_fatal() {
        for input in ["-", "+ 3", "."] {
            let (token, diag) = lex_one(input);
            assert_matches!(token, Token::Error { .. });
            assert_eq!(diag.count_of(codes::lexical::NUMBER_WITHOUT_DIGITS), 1, "{}", input);
        }
    }

    #[test]
    fn test_integer_clamped_once_with_rewritten_text() {
        let (token, diag) = lex_one("12345678901");
        assert_matches!(token, Token::Integer { ref text, value } => {
            assert_eq!(value, MAX_INTEGER);
            assert_eq!(text, "1000000000");
        });
        assert_eq!(diag.count_of(codes::lexical::INTEGER_OUT_OF_RANGE), 1);
        assert_eq!(diag.warnings(), 1);

        let (token, _) = lex_one("-5000000000");
        assert_matches!(token, Token::Integer { value, .. } => assert_eq!(value, MIN_INTEGER));

        let (token, diag) = lex_one("1000000000");
        assert_matches!(token, Token::Integer { value, .. } => assert_eq!(value, MAX_INTEGER));
        assert_eq!(diag.warnings(), 0);
    }

    #[test]
    fn test_excess_integer_digits_discarded_once() {
        let input = "9".repeat(40);
        let (token, diag) = lex_one(&input);
        assert_matches!(token, Token::Integer { value, .. } => assert_eq!(value, MAX_INTEGER));
        assert_eq!(diag.count_of(codes::lexical::INTEGER_DIGITS_DISCARDED), 1);
    }

    #[test]
    fn test_excess_fraction_digits_discarded_once() {
        let input = format!("0.{}", "1".repeat(40));
        let (token, diag) = lex_one(&input);
        assert_matches!(token, Token::Float { .. });
        assert_eq!(diag.count_of(codes::lexical::FRACTION_DIGITS_DISCARDED), 1);
    }

    #[test]
    fn test_labels_booleans_and_unknown_words() {
        let (token, _) = lex_one("HEADER>");
        assert_matches!(token, Token::Label { label: AlistLabel::Header, .. });

        let (token, diag) = lex_one("MAX_ERRORS>");
        assert_matches!(token, Token::Label { label: AlistLabel::Unknown, ref text } => {
            assert_eq!(text, "MAX_ERRORS>");
        });
        assert_eq!(diag.errors(), 0);

        assert_eq!(lex_one("TRUE").0, Token::Boolean(true));
        assert_eq!(lex_one("FALSE").0, Token::Boolean(false));

        let (token, diag) = lex_one("MAYBE");
        assert_matches!(token, Token::Error { .. });
        assert_eq!(diag.count_of(codes::lexical::UNKNOWN_TOKEN), 1);

        let (token, diag) = lex_one("defun");
        assert_matches!(token, Token::Error { .. });
        assert_eq!(diag.count_of(codes::lexical::UNKNOWN_TOKEN), 1);
    }

    #[test]
    fn test_private_values() {
        let (token, _) = lex_one("<<MATRIX>>");
        assert_matches!(token, Token::PrivateValue { value: PrivateValue::Matrix, .. });

        let (token, diag) = lex_one("<<DATE>>");
        assert_matches!(token, Token::PrivateValue { value: PrivateValue::Unknown, .. });
        assert_eq!(diag.errors(), 0);

        for input in ["<X>", "<<>>", "<<TEXT>x"] {
            let (token, diag) = lex_one(input);
            assert_matches!(token, Token::Error { .. });
            assert_eq!(diag.count_of(codes::lexical::MALFORMED_PRIVATE_VALUE), 1, "{}", input);
        }
    }

    #[test]
    fn test_unknown_character_lets_scanning_continue() {
        let (tokens, diag) = lex_all("# ( )");
        assert_matches!(tokens[0], Token::Error { .. });
        assert_eq!(&tokens[1..], &[Token::LeftParen, Token::RightParen, Token::Eof]);
        assert!(diag.stop_parse());
        assert!(!diag.stop_scan());
    }

    #[test]
    fn test_token_spans_carry_lines() {
        let mut diag = roomy();
        let mut lexer = Lexer::new(b"(\r\r|x|");
        assert_eq!(lexer.next_token(&mut diag).unwrap().line(), 1);
        assert_eq!(lexer.next_token(&mut diag).unwrap().line(), 3);
        assert_eq!(lexer.metrics().symbols, 1);
        assert_eq!(lexer.lines_read(), 3);
    }
}
