//! Source locations for tokens and diagnostics
//!
//! Offsets count input bytes. Lines count normalized line ends, so a CR LF
//! pair advances the line once.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Position after consuming `bytes` input bytes that produced `ch`
    pub fn advance(self, ch: char, bytes: usize) -> Self {
        if ch == '\n' {
            Self::new(self.offset + bytes, self.line + 1, 1)
        } else {
            Self::new(self.offset + bytes, self.line, self.column + 1)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Zero-width span, used for tokens synthesized at end of input
    pub fn single(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A value with its source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Line the value starts on
    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_over_newline_resets_column() {
        let pos = Position::start().advance('a', 1).advance('\n', 2);
        assert_eq!(pos, Position::new(3, 2, 1));
    }

    #[test]
    fn test_merge_covers_both() {
        let a = Span::new(Position::new(2, 1, 3), Position::new(4, 1, 5));
        let b = Span::new(Position::new(10, 2, 1), Position::new(12, 2, 3));
        let merged = b.merge(a);
        assert_eq!(merged.start(), a.start());
        assert_eq!(merged.end(), b.end());
        assert_eq!(merged.len(), 10);
    }

    #[test]
    fn test_single_is_empty() {
        assert!(Span::single(Position::start()).is_empty());
    }

    #[test]
    fn test_span_display() {
        let span = Span::new(Position::new(0, 3, 2), Position::new(4, 3, 6));
        assert_eq!(span.to_string(), "3:2-6");
    }
}
