//! Argument values: atoms, `(TIME> n)`, predicate and column-predicate values

use super::parser::OdbParser;
use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::config::constants::format::{OFFSET_FARG_NAME, ONSET_FARG_NAME, ORD_FARG_NAME};
use crate::diagnostics::{SystemError, SystemResult};
use crate::logging::codes;
use crate::semantic::builder::mismatch;
use crate::semantic::{
    build_atom, clamp_time, ArgKind, ColumnPredicateValue, FormalArg, ParsedValue, PredicateValue,
    Value, ValueContext,
};
use crate::sink::ColumnDecl;
use crate::tokens::{AlistLabel, Token};

/// Formal arguments of a column used as a predicate: ordinal, onset and
/// offset, then the column's own
pub fn column_predicate_args(column: &ColumnDecl) -> Vec<FormalArg> {
    let mut args = vec![
        FormalArg::new(ORD_FARG_NAME, ArgKind::Integer),
        FormalArg::new(ONSET_FARG_NAME, ArgKind::TimeStamp),
        FormalArg::new(OFFSET_FARG_NAME, ArgKind::TimeStamp),
    ];
    args.extend(column.formal_args.iter().cloned());
    args
}

impl<'a, 's> OdbParser<'a, 's> {
    /// Value for `farg` starting at the current token, which must not be
    /// `)` or end of input
    pub(super) fn parse_value(
        &mut self,
        farg: &FormalArg,
        context: ValueContext,
    ) -> SystemResult<ParsedValue> {
        if self.halted() {
            return Ok(ParsedValue::placeholder(farg));
        }
        if !self.at_value() {
            return Err(SystemError::precondition(
                "parse_value",
                "start of a value",
                self.token().kind_name(),
            ));
        }
        if self.token().is_left_paren() {
            return self.parse_list_value(farg, context);
        }

        let line = self.line();
        let value = build_atom(
            farg,
            self.window.token(),
            context,
            &*self.sink,
            &mut self.diag,
            line,
        );
        self.advance()?;
        Ok(value)
    }

    fn parse_list_value(
        &mut self,
        farg: &FormalArg,
        context: ValueContext,
    ) -> SystemResult<ParsedValue> {
        let time_entry = matches!(
            self.peek1(),
            Token::Label {
                label: AlistLabel::Time,
                ..
            }
        );
        match farg.kind {
            ArgKind::TimeStamp | ArgKind::Untyped if time_entry => {
                let ticks = self.parse_time_entry()?;
                Ok(ParsedValue::new(farg, Value::TimeStamp(ticks)))
            }
            ArgKind::Predicate | ArgKind::ColumnPredicate | ArgKind::Untyped => {
                self.parse_predicate_value(farg, context)
            }
            _ => {
                let line = self.line();
                let value = mismatch(farg, "list", &mut self.diag, line);
                self.skip_item()?;
                Ok(value)
            }
        }
    }

    /// `(TIME> n)` with the window on its `(`
    pub(super) fn parse_time_entry(&mut self) -> SystemResult<i64> {
        self.advance()?;
        self.advance()?;
        let ticks = match self.token() {
            Token::Integer { value, .. } | Token::Float { value, .. } => Some(*value),
            _ => None,
        };
        let ticks = match ticks {
            Some(value) => {
                let line = self.line();
                let ticks = clamp_time(value, &mut self.diag, line);
                self.advance()?;
                ticks
            }
            None if self.token().is_right_paren() => {
                self.warn(codes::syntax::MISSING_ALIST_VALUE, AlistLabel::Time.as_str());
                0
            }
            None => {
                if self.at_value() {
                    let found = self.token().kind_name();
                    self.warn(
                        codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
                        &format!("TIME> expects a number, found {}", found),
                    );
                    self.skip_item()?;
                }
                0
            }
        };
        self.close_entry()?;
        Ok(ticks)
    }

    /// `ONSET>`/`OFFSET>` value: `(TIME> n)` or a bare number
    pub(super) fn time_attribute(&mut self, label: AlistLabel) -> SystemResult<Option<i64>> {
        if self.halted() || self.token().is_eof() {
            return Ok(None);
        }
        if self.token().is_right_paren() {
            self.warn(codes::syntax::MISSING_ALIST_VALUE, label.as_str());
            return Ok(None);
        }
        let bare = match self.token() {
            Token::Integer { value, .. } | Token::Float { value, .. } => Some(*value),
            _ => None,
        };
        if let Some(value) = bare {
            let line = self.line();
            let ticks = clamp_time(value, &mut self.diag, line);
            self.advance()?;
            return Ok(Some(ticks));
        }
        if self.token().is_left_paren()
            && matches!(
                self.peek1(),
                Token::Label {
                    label: AlistLabel::Time,
                    ..
                }
            )
        {
            return self.parse_time_entry().map(Some);
        }

        let found = self.token().kind_name();
        self.warn(
            codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
            &format!("{} expects a time, found {}", label.as_str(), found),
        );
        self.skip_item()?;
        Ok(None)
    }

    fn parse_predicate_value(
        &mut self,
        farg: &FormalArg,
        context: ValueContext,
    ) -> SystemResult<ParsedValue> {
        if self.depth >= MAX_PARSE_DEPTH {
            self.fatal(
                codes::syntax::MAX_PARSE_DEPTH_EXCEEDED,
                &format!("limit is {}", MAX_PARSE_DEPTH),
            );
            return Ok(ParsedValue::placeholder(farg));
        }
        self.depth += 1;
        let value = self.parse_predicate_body(farg, context);
        self.depth -= 1;
        value
    }

    /// `( head arg ... )` or `()`. The head names a predicate or, failing
    /// that, a column whose cells the value matches.
    fn parse_predicate_body(
        &mut self,
        farg: &FormalArg,
        context: ValueContext,
    ) -> SystemResult<ParsedValue> {
        self.advance()?;
        let columns_only = farg.kind == ArgKind::ColumnPredicate;

        if self.token().is_right_paren() {
            self.advance()?;
            if columns_only {
                return Ok(ParsedValue::placeholder(farg));
            }
            return Ok(ParsedValue::new(farg, Value::Predicate(PredicateValue::empty())));
        }

        let name = match self.token() {
            Token::Symbol { text, flags } if !flags.is_formal_arg() => Some(text.clone()),
            _ => None,
        };
        let name = match name {
            Some(name) => name,
            None => {
                let line = self.line();
                let found = self.token().kind_name();
                let value = mismatch(farg, found, &mut self.diag, line);
                self.drain_list()?;
                return Ok(value);
            }
        };

        // nested values are never direct cell values
        let inner = ValueContext {
            cell_value: false,
            ..context
        };

        if !columns_only {
            if let Some(predicate) = self.sink.predicate_named(&name).cloned() {
                self.advance()?;
                let args = self.parse_args(
                    &name,
                    &predicate.formal_args,
                    predicate.variable_length,
                    inner,
                )?;
                return Ok(ParsedValue::new(
                    farg,
                    Value::Predicate(PredicateValue {
                        predicate: Some(predicate.id),
                        name,
                        args,
                    }),
                ));
            }
        }

        if let Some(column) = self.sink.column_named(&name).cloned() {
            self.advance()?;
            let formal_args = column_predicate_args(&column);
            let args = self.parse_args(&name, &formal_args, column.variable_length, inner)?;
            return Ok(ParsedValue::new(
                farg,
                Value::ColumnPredicate(ColumnPredicateValue {
                    column: column.id,
                    name,
                    args,
                }),
            ));
        }

        self.warn(codes::semantic::UNKNOWN_PREDICATE, &format!("|{}|", name));
        self.drain_list()?;
        if columns_only {
            return Ok(ParsedValue::placeholder(farg));
        }
        Ok(ParsedValue::new(farg, Value::Predicate(PredicateValue::empty())))
    }

    /// Arguments up to and including the closing `)`. Extras are skipped
    /// with one warning; missing ones are filled with placeholders.
    fn parse_args(
        &mut self,
        name: &str,
        formal_args: &[FormalArg],
        variable_length: bool,
        context: ValueContext,
    ) -> SystemResult<Vec<ParsedValue>> {
        let mut args = Vec::with_capacity(formal_args.len());
        let mut excess_reported = false;

        loop {
            if self.halted() {
                return Ok(args);
            }
            if self.token().is_right_paren() {
                self.advance()?;
                break;
            }
            if self.token().is_eof() {
                self.unexpected("')' closing the argument list");
                return Ok(args);
            }
            match formal_args.get(args.len()) {
                Some(farg) => {
                    let value = self.parse_value(farg, context)?;
                    args.push(value);
                }
                None if variable_length => {
                    let farg = FormalArg::untyped(format!("<arg{}>", args.len() + 1));
                    let value = self.parse_value(&farg, context)?;
                    args.push(value);
                }
                None => {
                    if !excess_reported {
                        self.warn(
                            codes::semantic::EXCESS_ARGS,
                            &format!("|{}| takes {}", name, formal_args.len()),
                        );
                        excess_reported = true;
                    }
                    self.skip_item()?;
                }
            }
        }

        let required = if variable_length {
            formal_args.len().min(1)
        } else {
            formal_args.len()
        };
        if args.len() < required {
            self.warn(
                codes::semantic::MISSING_ARGS,
                &format!("|{}| given {} of {}", name, args.len(), formal_args.len()),
            );
            while args.len() < required {
                args.push(ParsedValue::placeholder(&formal_args[args.len()]));
            }
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{parse, parse_with_sink};
    use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
    use crate::config::constants::format::QUERY_VAR_NAME;
    use crate::logging::codes;
    use crate::semantic::{ParsedValue, Value};
    use crate::sink::{DatabaseSink, MemoryDatabase};
    use assert_matches::assert_matches;

    const USER: &str = "(USER> ( \
        (PREDICATE-DEFINITIONS> ( (|pair| (FORMAL-ARG-LIST> (|<a>| |<b>|))) )) \
        (SPREADSHEET-VARIABLE-DECLARATIONS> ( \
            (|trial| ( (TYPE> <<MATRIX>>) (FORMAL-ARG-LIST> (|<n>| |<who>|)) )) \
            (|mood| ( (TYPE> <<PREDICATE>>) (FORMAL-ARG-LIST> (|<p>|)) )) )) ))";

    fn query(rules: &str) -> String {
        format!(
            "( setf macshapa-db '( (HEADER> (VERSION> 1)) {} (QUERY> ( {} )) ) )",
            USER, rules
        )
    }

    fn first_query_value(db: &MemoryDatabase) -> ParsedValue {
        let column = db.column_named(QUERY_VAR_NAME).unwrap().id;
        match &db.cells_in(column).next().unwrap().value {
            Value::Matrix(args) => args[0].clone(),
            other => panic!("expected matrix, got {:?}", other),
        }
    }

    #[test]
    fn test_excess_predicate_args_warn_once() {
        let (db, diag) = parse(&query("(|pair| 1 2 3 4 5)"));
        assert_eq!(diag.count_of(codes::semantic::EXCESS_ARGS), 1);
        assert_eq!(diag.warnings(), 1);
        assert_matches!(first_query_value(&db).value, Value::Predicate(p) if p.args.len() == 2);
    }

    #[test]
    fn test_missing_predicate_args_backfilled() {
        let (db, diag) = parse(&query("(|pair| 1)"));
        assert_eq!(diag.count_of(codes::semantic::MISSING_ARGS), 1);
        match first_query_value(&db).value {
            Value::Predicate(p) => {
                assert_eq!(p.args.len(), 2);
                assert_eq!(p.args[1].farg, "<b>");
                assert!(p.args[1].is_undefined());
            }
            other => panic!("expected predicate, got {:?}", other),
        }
    }

    #[test]
    fn test_variable_length_needs_one_arg() {
        let (_, diag) = parse(&query("(|print| 1 2 3)"));
        assert_eq!(diag.warnings(), 0);
        let (_, diag) = parse(&query("(|print|)"));
        assert_eq!(diag.count_of(codes::semantic::MISSING_ARGS), 1);
    }

    #[test]
    fn test_variable_length_keeps_args_past_formals() {
        let input = "( setf macshapa-db '( (HEADER> (VERSION> 1)) (USER> ( \
            (PREDICATE-DEFINITIONS> ( \
                (|many| ( (VARIABLE-LENGTH> TRUE) (FORMAL-ARG-LIST> (|<a>|)) )) )) )) \
            (QUERY> ( (|many| 1 2 3) )) ) )";
        let (db, diag) = parse(input);
        assert_eq!(diag.count_of(codes::semantic::EXCESS_ARGS), 0);
        assert_eq!(diag.warnings(), 0);
        match first_query_value(&db).value {
            Value::Predicate(p) => {
                assert_eq!(p.args.len(), 3);
                assert_eq!(p.args[0].farg, "<a>");
                assert_eq!(p.args[2].farg, "<arg3>");
                assert_eq!(p.args[2].value, Value::Integer(3));
            }
            other => panic!("expected predicate, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_predicate_yields_empty_value() {
        let (db, diag) = parse(&query("(|mystery| 1 (2 3))"));
        assert_eq!(diag.count_of(codes::semantic::UNKNOWN_PREDICATE), 1);
        assert_matches!(first_query_value(&db).value, Value::Predicate(p) if p.is_empty());
    }

    #[test]
    fn test_column_used_as_predicate() {
        let (db, diag) = parse(&query("(|trial| 1 (TIME> 60) 120 7 |bob|)"));
        assert_eq!(diag.warnings(), 0);
        match first_query_value(&db).value {
            Value::ColumnPredicate(c) => {
                assert_eq!(c.name, "trial");
                assert_eq!(c.args.len(), 5);
                assert_eq!(c.args[0].value, Value::Integer(1));
                assert_eq!(c.args[1].value, Value::TimeStamp(60));
                assert_eq!(c.args[2].value, Value::TimeStamp(120));
            }
            other => panic!("expected column predicate, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_predicate_is_legal() {
        let (db, diag) = parse(&query("()"));
        assert_eq!(diag.warnings(), 0);
        assert_matches!(first_query_value(&db).value, Value::Predicate(p) if p.is_empty());
    }

    #[test]
    fn test_list_where_number_expected() {
        let (db, diag) = parse(&query("(|trial| (1 2) 0 0 1 |x|)"));
        assert_eq!(diag.count_of(codes::semantic::VALUE_TYPE_MISMATCH), 1);
        match first_query_value(&db).value {
            Value::ColumnPredicate(c) => assert!(c.args[0].is_undefined()),
            other => panic!("expected column predicate, got {:?}", other),
        }
    }

    #[test]
    fn test_predicate_column_cell_holds_predicate() {
        let input = "( setf macshapa-db '( (HEADER> (VERSION> 1)) (USER> ( \
            (PREDICATE-DEFINITIONS> ( (|pair| (FORMAL-ARG-LIST> (|<a>| |<b>|))) )) \
            (SPREADSHEET-VARIABLE-DECLARATIONS> ( \
                (|mood| ( (TYPE> <<PREDICATE>>) (FORMAL-ARG-LIST> (|<p>|)) )) )) \
            (SPREADSHEET-VARIABLE-DEFINITIONS> ( \
                (|mood| (CELLS> ( ( (ONSET> 0) (OFFSET> 5) (|<p>| (|pair| |x| \"y\")) ) ))) )) )) ) )";
        let (db, diag) = parse(input);
        assert_eq!(diag.errors(), 0);
        assert_eq!(diag.warnings(), 0);
        let mood = db.column_named("mood").unwrap().id;
        let cell = db.cells_in(mood).next().unwrap();
        assert_matches!(&cell.value, Value::Predicate(p) if p.name == "pair" && p.args.len() == 2);
    }

    #[test]
    fn test_deep_nesting_is_fatal_not_overflow() {
        let depth = MAX_PARSE_DEPTH + 5;
        let nested = format!("{}1{}", "(|not| ".repeat(depth), ")".repeat(depth));
        let (_, diag) = parse(&query(&nested));
        assert_eq!(diag.count_of(codes::syntax::MAX_PARSE_DEPTH_EXCEEDED), 1);
        assert!(diag.stop_parse());
    }

    #[test]
    fn test_no_mutation_after_stop_load() {
        // the missing VERSION> stops loading before any declaration
        let input = "( setf macshapa-db '( (HEADER> (NAME> \"x\")) \
            (USER> (PREDICATE-DEFINITIONS> ( (|p| (FORMAL-ARG-LIST> (|<a>|))) ))) \
            (QUERY> ( (|p| 1) )) ) )";
        let mut db = MemoryDatabase::new();
        let before = db.predicates().len();
        let outcome = parse_with_sink(input, &mut db);
        assert!(outcome.diagnostics.stop_load());
        assert!(!outcome.diagnostics.stop_parse());
        assert_eq!(outcome.committed, 0);
        assert_eq!(db.predicates().len(), before);
        assert!(db.cells().is_empty());
        // parsing carried on and still checked the query
        assert_eq!(outcome.diagnostics.count_of(codes::semantic::UNKNOWN_PREDICATE), 1);
    }
}
