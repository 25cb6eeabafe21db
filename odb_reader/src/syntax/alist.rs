//! Attribute lists: `( (LABEL> value) ... )`, or the same entries placed
//! directly inside the enclosing list.
//!
//! Every alist in the format has a fixed label order. Entries are admitted
//! against a schema; duplicates, unknown labels and entries that arrive
//! after a later label are warned about and discarded.

use super::parser::OdbParser;
use crate::diagnostics::{SystemError, SystemResult};
use crate::logging::codes;
use crate::semantic::{coerce_integer, ArgKind, FormalArg};
use crate::tokens::{AlistLabel, PrivateValue, Token};

/// Labels in file order, each flagged as required or not
pub type AlistSchema = [(AlistLabel, bool)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Entry taken; carries required labels it skipped over
    Accept(Vec<AlistLabel>),
    Duplicate,
    Unknown,
    OutOfOrder,
}

#[derive(Debug)]
pub struct AlistTracker {
    schema: &'static AlistSchema,
    seen: Vec<bool>,
    reported: Vec<bool>,
    next: usize,
}

impl AlistTracker {
    pub fn new(schema: &'static AlistSchema) -> Self {
        Self {
            schema,
            seen: vec![false; schema.len()],
            reported: vec![false; schema.len()],
            next: 0,
        }
    }

    pub fn admit(&mut self, label: AlistLabel) -> Admission {
        let index = match self.schema.iter().position(|(l, _)| *l == label) {
            Some(index) => index,
            None => return Admission::Unknown,
        };
        if self.seen[index] {
            return Admission::Duplicate;
        }
        if index < self.next {
            return Admission::OutOfOrder;
        }

        let mut skipped = Vec::new();
        for i in self.next..index {
            if self.schema[i].1 && !self.seen[i] && !self.reported[i] {
                self.reported[i] = true;
                skipped.push(self.schema[i].0);
            }
        }
        self.seen[index] = true;
        self.next = index + 1;
        Admission::Accept(skipped)
    }

    /// Required labels never seen and not yet reported
    pub fn finish(&mut self) -> Vec<AlistLabel> {
        let mut missing = Vec::new();
        for (i, (label, required)) in self.schema.iter().enumerate() {
            if *required && !self.seen[i] && !self.reported[i] {
                self.reported[i] = true;
                missing.push(*label);
            }
        }
        missing
    }
}

impl<'a, 's> OdbParser<'a, 's> {
    /// Parse an alist value, calling `on_entry` for each admitted label with
    /// the window on the entry's value. The handler consumes the value only.
    pub(super) fn parse_alist_body<F>(
        &mut self,
        schema: &'static AlistSchema,
        mut on_entry: F,
    ) -> SystemResult<()>
    where
        F: FnMut(&mut Self, AlistLabel) -> SystemResult<()>,
    {
        if self.halted() {
            return Ok(());
        }
        let mut tracker = AlistTracker::new(schema);

        let list_form = if self.at_entry() {
            false
        } else if self.token().is_left_paren() {
            true
        } else {
            if self.token().is_right_paren() {
                self.warn(codes::syntax::MISSING_ALIST_VALUE, &self.context_path());
            } else if self.token().is_eof() {
                self.unexpected("attribute list");
                return Ok(());
            } else {
                let found = self.token().to_string();
                self.warn(
                    codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
                    &format!("expected attribute list, found {}", found),
                );
                self.skip_item()?;
            }
            self.report_missing(&mut tracker);
            return Ok(());
        };

        if list_form {
            self.advance()?;
        }

        loop {
            if self.halted() {
                return Ok(());
            }
            if self.at_entry() {
                self.parse_alist_entry(&mut tracker, &mut on_entry)?;
                continue;
            }
            if self.token().is_right_paren() {
                break;
            }
            if self.token().is_eof() {
                self.unexpected("')'");
                return Ok(());
            }
            let found = self.token().to_string();
            self.warn(codes::syntax::UNEXPECTED_LIST_ITEM, &found);
            self.skip_item()?;
        }

        self.report_missing(&mut tracker);
        if list_form && !self.halted() {
            self.advance()?;
        }
        Ok(())
    }

    /// One `(LABEL> value)` entry; the window is on its `(`
    pub(super) fn parse_alist_entry<F>(
        &mut self,
        tracker: &mut AlistTracker,
        mut on_entry: F,
    ) -> SystemResult<()>
    where
        F: FnMut(&mut Self, AlistLabel) -> SystemResult<()>,
    {
        self.advance()?;
        let (label, text) = match self.token() {
            Token::Label { label, text } => (*label, text.clone()),
            other => {
                return Err(SystemError::precondition(
                    "parse_alist_entry",
                    "attribute label",
                    other.kind_name(),
                ))
            }
        };
        self.advance()?;

        match tracker.admit(label) {
            Admission::Accept(skipped) => {
                for missing in skipped {
                    self.load_error(
                        codes::syntax::MISSING_REQUIRED_ENTRY,
                        &format!("{} before {}", missing.as_str(), text),
                    );
                }
                on_entry(self, label)?;
            }
            Admission::Duplicate => {
                self.warn(codes::syntax::DUPLICATE_ALIST_ENTRY, &text);
                self.discard_value()?;
            }
            Admission::Unknown => {
                self.warn(codes::syntax::UNKNOWN_ALIST_LABEL, &text);
                self.discard_value()?;
            }
            Admission::OutOfOrder => {
                self.warn(codes::syntax::ALIST_ENTRY_OUT_OF_ORDER, &text);
                self.discard_value()?;
            }
        }
        self.close_entry()
    }

    fn report_missing(&mut self, tracker: &mut AlistTracker) {
        for label in tracker.finish() {
            self.load_error(codes::syntax::MISSING_REQUIRED_ENTRY, label.as_str());
        }
    }

    /// Single-token attribute value. A missing value or one of the wrong
    /// type yields `None` with a warning.
    fn attribute_value<T>(
        &mut self,
        label: AlistLabel,
        expected: &str,
        extract: impl Fn(&Token) -> Option<T>,
    ) -> SystemResult<Option<T>> {
        if self.halted() || self.token().is_eof() {
            return Ok(None);
        }
        if self.token().is_right_paren() {
            self.warn(codes::syntax::MISSING_ALIST_VALUE, label.as_str());
            return Ok(None);
        }
        match extract(self.token()) {
            Some(value) => {
                self.advance()?;
                Ok(Some(value))
            }
            None => {
                let found = self.token().kind_name();
                self.warn(
                    codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
                    &format!("{} expects {}, found {}", label.as_str(), expected, found),
                );
                self.skip_item()?;
                Ok(None)
            }
        }
    }

    pub(super) fn string_value(&mut self, label: AlistLabel) -> SystemResult<Option<String>> {
        self.attribute_value(label, "string", |t| match t {
            Token::Str { text, .. } => Some(text.clone()),
            _ => None,
        })
    }

    pub(super) fn integer_value(&mut self, label: AlistLabel) -> SystemResult<Option<i64>> {
        self.attribute_value(label, "integer", |t| match t {
            Token::Integer { value, .. } | Token::Float { value, .. } => {
                Some(coerce_integer(*value))
            }
            _ => None,
        })
    }

    pub(super) fn boolean_value(&mut self, label: AlistLabel) -> SystemResult<Option<bool>> {
        self.attribute_value(label, "TRUE or FALSE", |t| match t {
            Token::Boolean(value) => Some(*value),
            _ => None,
        })
    }

    /// Private value with its spelling, for diagnostics about unknown ones
    pub(super) fn private_value(
        &mut self,
        label: AlistLabel,
    ) -> SystemResult<Option<(PrivateValue, String)>> {
        self.attribute_value(label, "type name", |t| match t {
            Token::PrivateValue { value, text } => Some((*value, text.clone())),
            _ => None,
        })
    }

    /// Clamp an integer attribute into `min..=max`
    pub(super) fn clamp_attribute(&mut self, label: AlistLabel, value: i64, min: i64, max: i64) -> i64 {
        if value < min || value > max {
            let clamped = value.clamp(min, max);
            self.warn(
                codes::semantic::VALUE_OUT_OF_RANGE,
                &format!("{} {} outside {}..={}, using {}", label.as_str(), value, min, max, clamped),
            );
            return clamped;
        }
        value
    }

    /// `( |<a>| |<b>| ... )`. Repeated names are dropped with a warning.
    pub(super) fn formal_arg_list(
        &mut self,
        label: AlistLabel,
        kind: ArgKind,
    ) -> SystemResult<Option<Vec<FormalArg>>> {
        if self.halted() || self.token().is_eof() {
            return Ok(None);
        }
        if self.token().is_right_paren() {
            self.warn(codes::syntax::MISSING_ALIST_VALUE, label.as_str());
            return Ok(None);
        }
        if !self.token().is_left_paren() {
            let found = self.token().kind_name();
            self.warn(
                codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
                &format!("{} expects a list, found {}", label.as_str(), found),
            );
            self.skip_item()?;
            return Ok(None);
        }
        self.advance()?;

        let mut fargs: Vec<FormalArg> = Vec::new();
        loop {
            if self.halted() {
                return Ok(None);
            }
            let name = match self.token() {
                Token::RightParen => break,
                Token::Eof => {
                    self.unexpected("')'");
                    return Ok(None);
                }
                Token::Symbol { text, flags } if flags.is_formal_arg() => Some(text.clone()),
                _ => None,
            };
            match name {
                Some(name) if fargs.iter().any(|f| f.name == name) => {
                    self.warn(codes::semantic::DUPLICATE_FORMAL_ARG, &name);
                    self.advance()?;
                }
                Some(name) => {
                    fargs.push(FormalArg::new(name, kind));
                    self.advance()?;
                }
                None => {
                    let found = self.token().to_string();
                    self.warn(codes::syntax::UNEXPECTED_LIST_ITEM, &found);
                    self.skip_item()?;
                }
            }
        }
        self.advance()?;
        Ok(Some(fargs))
    }
}
