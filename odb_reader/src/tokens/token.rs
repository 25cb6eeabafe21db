//! Token model
//!
//! Each variant carries only the payload that is meaningful for it. Symbol
//! and string tokens carry a classification set that starts wide and can
//! only be narrowed as the lexer sees more characters.

use super::tables::{AlistLabel, PrivateValue};
use serde::Serialize;
use std::fmt;

/// What a `|...|` symbol may still turn out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SymbolFlags(u8);

impl SymbolFlags {
    pub const PREDICATE: u8 = 0x01;
    pub const COLUMN: u8 = 0x02;
    pub const NOMINAL: u8 = 0x04;
    pub const FORMAL_ARG: u8 = 0x08;

    /// Starting set for an ordinary symbol
    pub const fn names() -> Self {
        Self(Self::PREDICATE | Self::COLUMN | Self::NOMINAL)
    }

    /// Starting set for a `|<name>|` symbol
    pub const fn formal_arg() -> Self {
        Self(Self::FORMAL_ARG)
    }

    pub fn clear(&mut self, bits: u8) {
        self.0 &= !bits;
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn could_be_predicate(&self) -> bool {
        self.0 & Self::PREDICATE != 0
    }

    pub fn could_be_column(&self) -> bool {
        self.0 & Self::COLUMN != 0
    }

    pub fn could_be_nominal(&self) -> bool {
        self.0 & Self::NOMINAL != 0
    }

    pub fn is_formal_arg(&self) -> bool {
        self.0 & Self::FORMAL_ARG != 0
    }
}

/// What a `"..."` string may still be used as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StringFlags(u8);

impl StringFlags {
    pub const QUOTE_STRING: u8 = 0x01;
    pub const TEXT_QUOTE_STRING: u8 = 0x02;
    pub const NON_BLANK: u8 = 0x04;

    pub const fn all() -> Self {
        Self(Self::QUOTE_STRING | Self::TEXT_QUOTE_STRING | Self::NON_BLANK)
    }

    pub fn clear(&mut self, bits: u8) {
        self.0 &= !bits;
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn could_be_quote_string(&self) -> bool {
        self.0 & Self::QUOTE_STRING != 0
    }

    pub fn could_be_text(&self) -> bool {
        self.0 & Self::TEXT_QUOTE_STRING != 0
    }

    pub fn is_non_blank(&self) -> bool {
        self.0 & Self::NON_BLANK != 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Token {
    LeftParen,
    RightParen,
    Symbol { text: String, flags: SymbolFlags },
    /// Integer in the clamped range, kept as f64 like every number
    Integer { text: String, value: f64 },
    Float { text: String, value: f64 },
    Str { text: String, flags: StringFlags },
    Boolean(bool),
    Label { text: String, label: AlistLabel },
    PrivateValue { text: String, value: PrivateValue },
    /// `setf`
    Setf,
    /// `macshapa-db`
    DbVar,
    /// `'`
    Quote,
    Eof,
    /// Result of a fatal lexical error
    Error { text: String },
}

impl Token {
    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }

    pub fn is_left_paren(&self) -> bool {
        matches!(self, Token::LeftParen)
    }

    pub fn is_right_paren(&self) -> bool {
        matches!(self, Token::RightParen)
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Token::Label { .. })
    }

    /// Short name of the token kind for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::LeftParen => "left parenthesis",
            Token::RightParen => "right parenthesis",
            Token::Symbol { .. } => "symbol",
            Token::Integer { .. } => "integer",
            Token::Float { .. } => "float",
            Token::Str { .. } => "string",
            Token::Boolean(_) => "boolean",
            Token::Label { .. } => "attribute label",
            Token::PrivateValue { .. } => "private value",
            Token::Setf => "setf",
            Token::DbVar => "macshapa-db",
            Token::Quote => "quote",
            Token::Eof => "end of input",
            Token::Error { .. } => "error token",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Symbol { text, .. } => write!(f, "|{}|", text),
            Token::Integer { text, .. } | Token::Float { text, .. } => write!(f, "{}", text),
            Token::Str { text, .. } => write!(f, "\"{}\"", text),
            Token::Boolean(true) => write!(f, "TRUE"),
            Token::Boolean(false) => write!(f, "FALSE"),
            Token::Label { text, .. } | Token::PrivateValue { text, .. } => write!(f, "{}", text),
            Token::Setf => write!(f, "setf"),
            Token::DbVar => write!(f, "macshapa-db"),
            Token::Quote => write!(f, "'"),
            Token::Eof => write!(f, "<EOF>"),
            Token::Error { text } => write!(f, "{}", text),
        }
    }
}
