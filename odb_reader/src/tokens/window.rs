//! Three-slot token window
//!
//! The parser sees the current token and two tokens of lookahead. Once the
//! lexer has produced `Eof`, or scanning has been stopped, the remaining
//! slots are filled with manufactured `Eof` tokens and the lexer is not
//! called again.

use crate::diagnostics::{DiagnosticState, SystemError, SystemResult};
use crate::lexical::Lexer;
use crate::tokens::Token;
use crate::utils::{Span, Spanned};

pub struct TokenWindow<'a> {
    lexer: Lexer<'a>,
    slots: [Spanned<Token>; 3],
}

impl<'a> TokenWindow<'a> {
    pub fn new(mut lexer: Lexer<'a>, diag: &mut DiagnosticState) -> SystemResult<Self> {
        let first = Self::pull(&mut lexer, None, diag)?;
        let second = Self::pull(&mut lexer, Some(&first), diag)?;
        let third = Self::pull(&mut lexer, Some(&second), diag)?;
        Ok(Self {
            lexer,
            slots: [first, second, third],
        })
    }

    fn pull(
        lexer: &mut Lexer<'a>,
        previous: Option<&Spanned<Token>>,
        diag: &mut DiagnosticState,
    ) -> SystemResult<Spanned<Token>> {
        if let Some(previous) = previous {
            if previous.value.is_eof() {
                return Ok(Spanned::new(Token::Eof, Span::single(previous.span.end)));
            }
        }
        if diag.stop_scan() {
            return Ok(Spanned::new(Token::Eof, Span::single(lexer.position())));
        }
        lexer.next_token(diag)
    }

    /// Shift the window one token. Advancing off `Eof` is a fault.
    pub fn advance(&mut self, diag: &mut DiagnosticState) -> SystemResult<()> {
        if self.slots[0].value.is_eof() {
            return Err(SystemError::AdvancePastEof);
        }
        self.slots.rotate_left(1);
        self.slots[2] = Self::pull(&mut self.lexer, Some(&self.slots[1]), diag)?;
        Ok(())
    }

    pub fn current(&self) -> &Spanned<Token> {
        &self.slots[0]
    }

    pub fn token(&self) -> &Token {
        &self.slots[0].value
    }

    pub fn lookahead1(&self) -> &Token {
        &self.slots[1].value
    }

    pub fn lookahead2(&self) -> &Token {
        &self.slots[2].value
    }

    /// Line of the current token
    pub fn line(&self) -> u32 {
        self.slots[0].line()
    }

    pub fn lexer(&self) -> &Lexer<'a> {
        &self.lexer
    }

    /// Scan the rest of the input so the line count and lexical diagnostics
    /// cover the whole file. Stops at end of input or when scanning stops.
    pub fn drain(&mut self, diag: &mut DiagnosticState) -> SystemResult<()> {
        if self.slots.iter().any(|slot| slot.value.is_eof()) {
            return Ok(());
        }
        while !diag.stop_scan() {
            if self.lexer.next_token(diag)?.value.is_eof() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticLimits;
    use crate::logging::codes;
    use assert_matches::assert_matches;

    fn window(input: &'static str, diag: &mut DiagnosticState) -> TokenWindow<'static> {
        TokenWindow::new(Lexer::new(input.as_bytes()), diag).unwrap()
    }

    #[test]
    fn test_window_primes_three_slots() {
        let mut diag = DiagnosticState::default();
        let w = window("( setf macshapa-db", &mut diag);
        assert_eq!(w.token(), &Token::LeftParen);
        assert_eq!(w.lookahead1(), &Token::Setf);
        assert_eq!(w.lookahead2(), &Token::DbVar);
    }

    #[test]
    fn test_short_input_fills_with_eof() {
        let mut diag = DiagnosticState::default();
        let mut w = window(")", &mut diag);
        assert_eq!(w.token(), &Token::RightParen);
        assert!(w.lookahead1().is_eof());
        assert!(w.lookahead2().is_eof());

        w.advance(&mut diag).unwrap();
        assert!(w.token().is_eof());
        assert_matches!(w.advance(&mut diag), Err(SystemError::AdvancePastEof));
    }

    #[test]
    fn test_stop_scan_manufactures_eof() {
        let mut diag = DiagnosticState::new(DiagnosticLimits::new(10, 10, 0));
        let mut w = window("( \"open", &mut diag);
        assert_eq!(w.token(), &Token::LeftParen);
        assert_matches!(w.lookahead1(), Token::Error { .. });
        assert!(diag.stop_scan());
        assert!(w.lookahead2().is_eof());

        w.advance(&mut diag).unwrap();
        w.advance(&mut diag).unwrap();
        assert!(w.token().is_eof());
        assert_eq!(diag.count_of(codes::lexical::UNEXPECTED_EOF_IN_TOKEN), 1);
    }

    #[test]
    fn test_drain_scans_remaining_input() {
        let mut diag = DiagnosticState::default();
        let mut w = window("( ( ( ( #", &mut diag);
        w.drain(&mut diag).unwrap();
        assert_eq!(diag.count_of(codes::lexical::UNKNOWN_TOKEN), 1);
        assert_eq!(w.lexer().metrics().error_tokens, 1);
    }
}
