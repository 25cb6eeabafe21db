//! Lexical analysis
//!
//! Turns raw database bytes into tokens on demand. The lexer never reads
//! ahead more than one character and never buffers more than the current
//! physical line.

pub mod analyzer;
pub mod source;

pub use analyzer::{Lexer, LexicalMetrics};
pub use source::CharSource;
