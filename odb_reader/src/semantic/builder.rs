//! Value construction for atomic tokens
//!
//! List-shaped values (predicates, column predicates, `(TIME> n)`) are
//! assembled by the parser, which then hands their atoms back here.

use super::types::{ArgKind, FormalArg, ParsedValue, Value};
use crate::config::constants::format::{MAX_INTEGER, MAX_TIME, MIN_INTEGER, MIN_TIME};
use crate::diagnostics::DiagnosticState;
use crate::logging::codes;
use crate::sink::DatabaseSink;
use crate::tokens::Token;

/// Where the value being built sits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueContext {
    /// Direct value of a non-matrix spreadsheet cell
    pub cell_value: bool,
    /// Anywhere inside the `QUERY>` section
    pub in_query: bool,
}

/// Round half away from zero, then clamp into the integer range
pub fn coerce_integer(value: f64) -> i64 {
    value.round().clamp(MIN_INTEGER, MAX_INTEGER) as i64
}

/// Cell nominals may not contain `|` or `:`
pub fn sanitize_cell_nominal(text: &str) -> String {
    text.chars()
        .map(|c| if c == '|' || c == ':' { '_' } else { c })
        .collect()
}

/// Ticks clamped into the legal time range, warning when clamped
pub fn clamp_time(value: f64, diag: &mut DiagnosticState, line: u32) -> i64 {
    let ticks = value.round();
    if ticks < MIN_TIME as f64 || ticks > MAX_TIME as f64 {
        diag.warn(codes::semantic::TIME_OUT_OF_RANGE, line, &format!("{}", value));
        return ticks.clamp(MIN_TIME as f64, MAX_TIME as f64) as i64;
    }
    ticks as i64
}

/// Build the value of `farg` from a single non-list token. A mismatch
/// yields the placeholder and one warning.
pub fn build_atom(
    farg: &FormalArg,
    token: &Token,
    context: ValueContext,
    sink: &dyn DatabaseSink,
    diag: &mut DiagnosticState,
    line: u32,
) -> ParsedValue {
    if let Token::Symbol { flags, .. } = token {
        if flags.is_formal_arg() {
            return ParsedValue::placeholder(farg);
        }
    }

    let value = match (farg.kind, token) {
        (ArgKind::Float, Token::Integer { value, .. } | Token::Float { value, .. }) => {
            Some(Value::Float(*value))
        }
        (ArgKind::Integer, Token::Integer { value, .. } | Token::Float { value, .. }) => {
            Some(Value::Integer(coerce_integer(*value)))
        }
        (ArgKind::TimeStamp, Token::Integer { value, .. } | Token::Float { value, .. }) => {
            Some(Value::TimeStamp(clamp_time(*value, diag, line)))
        }
        (ArgKind::Nominal | ArgKind::Untyped, Token::Symbol { text, flags })
            if flags.could_be_nominal() =>
        {
            return build_nominal(farg, text, context, sink, diag, line);
        }
        (ArgKind::Text, Token::Str { text, flags }) if flags.could_be_text() => {
            Some(Value::Text(text.clone()))
        }
        (ArgKind::Untyped, Token::Integer { value, .. }) => {
            Some(Value::Integer(coerce_integer(*value)))
        }
        (ArgKind::Untyped, Token::Float { value, .. }) => Some(Value::Float(*value)),
        (ArgKind::Untyped, Token::Str { text, flags }) if flags.could_be_quote_string() => {
            Some(Value::QuoteString(text.clone()))
        }
        _ => None,
    };

    match value {
        Some(value) => ParsedValue::new(farg, value),
        None => mismatch(farg, token.kind_name(), diag, line),
    }
}

fn build_nominal(
    farg: &FormalArg,
    text: &str,
    context: ValueContext,
    sink: &dyn DatabaseSink,
    diag: &mut DiagnosticState,
    line: u32,
) -> ParsedValue {
    if context.in_query && sink.is_name_in_use(text) {
        diag.warn(
            codes::semantic::RESERVED_NOMINAL,
            line,
            &format!("|{}| for {}", text, farg.name),
        );
        return ParsedValue::placeholder(farg);
    }

    let text = if context.cell_value {
        sanitize_cell_nominal(text)
    } else {
        text.to_string()
    };
    ParsedValue::new(farg, Value::Nominal(text))
}

/// Placeholder for `farg` with a type-mismatch warning
pub fn mismatch(
    farg: &FormalArg,
    found: &str,
    diag: &mut DiagnosticState,
    line: u32,
) -> ParsedValue {
    diag.warn(
        codes::semantic::VALUE_TYPE_MISMATCH,
        line,
        &format!("{} expects {}, found {}", farg.name, farg.kind, found),
    );
    ParsedValue::placeholder(farg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticLimits;
    use crate::sink::MemoryDatabase;
    use crate::tokens::{StringFlags, SymbolFlags};
    use assert_matches::assert_matches;

    fn diag() -> DiagnosticState {
        DiagnosticState::new(DiagnosticLimits::new(99, 10, 0))
    }

    fn symbol(text: &str) -> Token {
        Token::Symbol {
            text: text.to_string(),
            flags: SymbolFlags::names(),
        }
    }

    fn int(value: f64) -> Token {
        Token::Integer {
            text: value.to_string(),
            value,
        }
    }

    #[test]
    fn test_coerce_integer_rounds_half_away_from_zero() {
        assert_eq!(coerce_integer(2.5), 3);
        assert_eq!(coerce_integer(-2.5), -3);
        assert_eq!(coerce_integer(2.4), 2);
        assert_eq!(coerce_integer(5e12), 1_000_000_000);
        assert_eq!(coerce_integer(-5e12), -1_000_000_000);
    }

    #[test]
    fn test_sanitize_cell_nominal() {
        assert_eq!(sanitize_cell_nominal("a|b:c"), "a_b_c");
    }

    #[test]
    fn test_clamp_time_warns() {
        let mut d = diag();
        assert_eq!(clamp_time(120.0, &mut d, 1), 120);
        assert_eq!(d.warnings(), 0);
        assert_eq!(clamp_time(-5.0, &mut d, 1), 0);
        assert_eq!(clamp_time(1e12, &mut d, 1), MAX_TIME);
        assert_eq!(d.count_of(codes::semantic::TIME_OUT_OF_RANGE), 2);
    }

    #[test]
    fn test_numbers_interconvert() {
        let db = MemoryDatabase::new();
        let mut d = diag();
        let float_slot = FormalArg::new("<f>", ArgKind::Float);
        let int_slot = FormalArg::new("<i>", ArgKind::Integer);

        let v = build_atom(&float_slot, &int(4.0), ValueContext::default(), &db, &mut d, 1);
        assert_eq!(v.value, Value::Float(4.0));

        let token = Token::Float {
            text: "2.5".to_string(),
            value: 2.5,
        };
        let v = build_atom(&int_slot, &token, ValueContext::default(), &db, &mut d, 1);
        assert_eq!(v.value, Value::Integer(3));
        assert_eq!(d.warnings(), 0);
    }

    #[test]
    fn test_formal_arg_symbol_is_undefined() {
        let db = MemoryDatabase::new();
        let mut d = diag();
        let slot = FormalArg::new("<i>", ArgKind::Integer);
        let token = Token::Symbol {
            text: "<i>".to_string(),
            flags: SymbolFlags::formal_arg(),
        };
        let v = build_atom(&slot, &token, ValueContext::default(), &db, &mut d, 1);
        assert!(v.is_undefined());
        assert_eq!(d.warnings(), 0);
    }

    #[test]
    fn test_mismatch_yields_placeholder_and_warning() {
        let db = MemoryDatabase::new();
        let mut d = diag();
        let slot = FormalArg::new("<i>", ArgKind::Integer);
        let v = build_atom(&slot, &symbol("red"), ValueContext::default(), &db, &mut d, 4);
        assert!(v.is_undefined());
        assert_eq!(v.farg, "<i>");
        assert_eq!(d.count_of(codes::semantic::VALUE_TYPE_MISMATCH), 1);
    }

    #[test]
    fn test_cell_nominals_are_sanitized() {
        let db = MemoryDatabase::new();
        let mut d = diag();
        let slot = FormalArg::new("<val>", ArgKind::Nominal);
        let token = Token::Symbol {
            text: "a:b".to_string(),
            flags: SymbolFlags::names(),
        };
        let cell = ValueContext {
            cell_value: true,
            in_query: false,
        };
        let v = build_atom(&slot, &token, cell, &db, &mut d, 1);
        assert_eq!(v.value, Value::Nominal("a_b".to_string()));

        let v = build_atom(&slot, &token, ValueContext::default(), &db, &mut d, 1);
        assert_eq!(v.value, Value::Nominal("a:b".to_string()));
    }

    #[test]
    fn test_query_rejects_names_in_use_as_nominals() {
        let db = MemoryDatabase::new();
        let mut d = diag();
        let slot = FormalArg::untyped("<x>");
        let query = ValueContext {
            cell_value: false,
            in_query: true,
        };
        let v = build_atom(&slot, &symbol("and"), query, &db, &mut d, 1);
        assert!(v.is_undefined());
        assert_eq!(d.count_of(codes::semantic::RESERVED_NOMINAL), 1);

        let v = build_atom(&slot, &symbol("and"), ValueContext::default(), &db, &mut d, 1);
        assert_eq!(v.value, Value::Nominal("and".to_string()));
    }

    #[test]
    fn test_untyped_strings() {
        let db = MemoryDatabase::new();
        let mut d = diag();
        let slot = FormalArg::untyped("<x>");
        let quote = Token::Str {
            text: "hi".to_string(),
            flags: StringFlags::all(),
        };
        let v = build_atom(&slot, &quote, ValueContext::default(), &db, &mut d, 1);
        assert_matches!(v.value, Value::QuoteString(ref s) if s == "hi");

        let mut flags = StringFlags::all();
        flags.clear(StringFlags::QUOTE_STRING);
        let text = Token::Str {
            text: "a\"b".to_string(),
            flags,
        };
        let v = build_atom(&slot, &text, ValueContext::default(), &db, &mut d, 1);
        assert!(v.is_undefined());

        let text_slot = FormalArg::new("<t>", ArgKind::Text);
        let v = build_atom(&text_slot, &text, ValueContext::default(), &db, &mut d, 1);
        assert_matches!(v.value, Value::Text(_));
    }
}
