//! `USER>` section: predicate definitions, column declarations and column
//! contents

use super::alist::{AlistSchema, AlistTracker};
use super::parser::OdbParser;
use crate::config::constants::format::{
    DEFAULT_COLUMN_WIDTH, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH, PLACEHOLDER_FARG_NAME,
};
use crate::diagnostics::SystemResult;
use crate::log_debug;
use crate::logging::codes;
use crate::semantic::{ArgKind, ColumnType, FormalArg, ParsedValue, ValueContext};
use crate::sink::{ColumnDecl, VocabEntry};
use crate::tokens::{AlistLabel, SymbolFlags, Token};

const USER_SCHEMA: &AlistSchema = &[
    (AlistLabel::PredicateDefinitions, false),
    (AlistLabel::SpreadsheetVariableDeclarations, false),
    (AlistLabel::SpreadsheetVariableDefinitions, false),
];

const PREDICATE_SCHEMA: &AlistSchema = &[
    (AlistLabel::VariableLength, false),
    (AlistLabel::FormalArgList, true),
];

const COLUMN_DECLARATION_SCHEMA: &AlistSchema = &[
    (AlistLabel::Type, true),
    (AlistLabel::VariableLength, false),
    (AlistLabel::FormalArgList, true),
    (AlistLabel::ColumnWidth, false),
];

const COLUMN_DEFINITION_SCHEMA: &AlistSchema = &[
    (AlistLabel::Cells, false),
    (AlistLabel::Vocab, false),
];

const CELL_SCHEMA: &AlistSchema = &[(AlistLabel::Onset, true), (AlistLabel::Offset, true)];

/// Attributes of a predicate or column declaration, as read
#[derive(Debug, Default)]
struct Declaration {
    column_type: Option<ColumnType>,
    variable_length: bool,
    formal_args: Option<Vec<FormalArg>>,
    width: Option<u32>,
}

impl<'a, 's> OdbParser<'a, 's> {
    pub(super) fn parse_user(&mut self) -> SystemResult<()> {
        self.push_context("user");
        self.parse_alist_body(USER_SCHEMA, |p, label| match label {
            AlistLabel::PredicateDefinitions => {
                p.parse_item_list(label, |p| p.parse_predicate_definition())
            }
            AlistLabel::SpreadsheetVariableDeclarations => {
                p.parse_item_list(label, |p| p.parse_column_declaration())
            }
            AlistLabel::SpreadsheetVariableDefinitions => {
                p.parse_item_list(label, |p| p.parse_column_definition())
            }
            _ => p.discard_value(),
        })?;
        self.section_done(AlistLabel::User);
        self.pop_context();
        Ok(())
    }

    /// `( item ... )` where each item is a list handed to `item` with the
    /// window on its `(`. Anything else in the list is skipped.
    pub(super) fn parse_item_list<F>(&mut self, label: AlistLabel, mut item: F) -> SystemResult<()>
    where
        F: FnMut(&mut Self) -> SystemResult<()>,
    {
        if self.halted() || self.token().is_eof() {
            return Ok(());
        }
        if self.token().is_right_paren() {
            self.warn(codes::syntax::MISSING_ALIST_VALUE, label.as_str());
            return Ok(());
        }
        if !self.token().is_left_paren() {
            let found = self.token().kind_name();
            self.warn(
                codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
                &format!("{} expects a list, found {}", label.as_str(), found),
            );
            return self.skip_item();
        }
        self.advance()?;

        loop {
            if self.halted() {
                return Ok(());
            }
            if self.token().is_right_paren() {
                return self.advance();
            }
            if self.token().is_eof() {
                self.unexpected("')'");
                return Ok(());
            }
            if self.token().is_left_paren() {
                item(self)?;
                continue;
            }
            let found = self.token().to_string();
            self.warn(codes::syntax::UNEXPECTED_LIST_ITEM, &found);
            self.skip_item()?;
        }
    }

    /// Opening `(` and name of a definition item. `None` when the item does
    /// not start with a plain symbol; the caller abandons it.
    fn item_name(&mut self) -> SystemResult<Option<(String, SymbolFlags)>> {
        self.advance()?;
        let named = match self.token() {
            Token::Symbol { text, flags } if !flags.is_formal_arg() => Some((text.clone(), *flags)),
            _ => None,
        };
        match named {
            Some(named) => {
                self.advance()?;
                Ok(Some(named))
            }
            None => {
                let found = self.token().to_string();
                self.warn(
                    codes::syntax::UNEXPECTED_LIST_ITEM,
                    &format!("expected a name, found {}", found),
                );
                Ok(None)
            }
        }
    }

    fn abandon_item(&mut self) -> SystemResult<()> {
        self.discard_value()?;
        self.close_entry()
    }

    /// Shared attribute handler for predicate and column declarations
    fn declaration_entry(
        &mut self,
        label: AlistLabel,
        declaration: &mut Declaration,
        arg_kind: ArgKind,
    ) -> SystemResult<()> {
        match label {
            AlistLabel::Type => {
                if let Some((value, text)) = self.private_value(label)? {
                    match ColumnType::from_private(value) {
                        Some(column_type) => declaration.column_type = Some(column_type),
                        None => self.warn(
                            codes::semantic::UNKNOWN_TYPE,
                            &format!("{}, using <<MATRIX>>", text),
                        ),
                    }
                }
            }
            AlistLabel::VariableLength => {
                if let Some(value) = self.boolean_value(label)? {
                    declaration.variable_length = value;
                }
            }
            AlistLabel::FormalArgList => {
                declaration.formal_args = self.formal_arg_list(label, arg_kind)?;
            }
            AlistLabel::ColumnWidth => {
                if let Some(width) = self.integer_value(label)? {
                    let width = self.clamp_attribute(
                        label,
                        width,
                        MIN_COLUMN_WIDTH as i64,
                        MAX_COLUMN_WIDTH as i64,
                    );
                    declaration.width = Some(width as u32);
                }
            }
            _ => self.discard_value()?,
        }
        Ok(())
    }

    /// Formal arguments of a declaration, with the placeholder standing in
    /// for an empty list
    fn declared_formal_args(&mut self, name: &str, formal_args: Option<Vec<FormalArg>>) -> Option<Vec<FormalArg>> {
        let mut formal_args = formal_args?;
        if formal_args.is_empty() {
            self.warn(codes::semantic::EMPTY_FORMAL_ARG_LIST, name);
            formal_args.push(FormalArg::untyped(PLACEHOLDER_FARG_NAME));
        }
        Some(formal_args)
    }

    fn name_available(&mut self, name: &str) -> bool {
        if self.sink.is_name_in_use(name) {
            self.warn(codes::semantic::DUPLICATE_NAME, &format!("|{}|", name));
            return false;
        }
        true
    }

    // ------------------------------------------------------------------
    // PREDICATE-DEFINITIONS>
    // ------------------------------------------------------------------

    fn parse_predicate_definition(&mut self) -> SystemResult<()> {
        let (name, flags) = match self.item_name()? {
            Some(named) => named,
            None => return self.abandon_item(),
        };

        let mut declaration = Declaration::default();
        self.parse_alist_body(PREDICATE_SCHEMA, |p, label| {
            p.declaration_entry(label, &mut declaration, ArgKind::Untyped)
        })?;
        self.close_entry()?;
        if self.halted() {
            return Ok(());
        }

        if !flags.could_be_predicate() {
            self.warn(
                codes::semantic::INVALID_NAME,
                &format!("|{}| cannot name a predicate", name),
            );
            return Ok(());
        }
        if !self.name_available(&name) {
            return Ok(());
        }
        let formal_args = match self.declared_formal_args(&name, declaration.formal_args) {
            Some(formal_args) => formal_args,
            None => return Ok(()),
        };

        if self.loading() {
            let variable_length = declaration.variable_length;
            let id = self.commit("declare_predicate", |sink| {
                sink.declare_predicate(&name, formal_args, variable_length)
            })?;
            log_debug!("Predicate declared", "name" => &name, "id" => id);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // SPREADSHEET-VARIABLE-DECLARATIONS>
    // ------------------------------------------------------------------

    fn parse_column_declaration(&mut self) -> SystemResult<()> {
        let (name, flags) = match self.item_name()? {
            Some(named) => named,
            None => return self.abandon_item(),
        };

        let mut declaration = Declaration::default();
        self.parse_alist_body(COLUMN_DECLARATION_SCHEMA, |p, label| {
            p.declaration_entry(label, &mut declaration, ArgKind::Untyped)
        })?;
        self.close_entry()?;
        if self.halted() {
            return Ok(());
        }

        if !flags.could_be_column() {
            self.warn(
                codes::semantic::INVALID_NAME,
                &format!("|{}| cannot name a column", name),
            );
            return Ok(());
        }
        if !self.name_available(&name) {
            return Ok(());
        }
        let mut formal_args = match self.declared_formal_args(&name, declaration.formal_args) {
            Some(formal_args) => formal_args,
            None => return Ok(()),
        };

        let column_type = declaration.column_type.unwrap_or(ColumnType::Matrix);
        let mut variable_length = declaration.variable_length;
        if !column_type.is_matrix() {
            if variable_length {
                self.warn(codes::semantic::INVALID_VARIABLE_LENGTH, &name);
                variable_length = false;
            }
            if formal_args.len() > 1 {
                self.warn(
                    codes::semantic::TOO_MANY_FORMAL_ARGS,
                    &format!("|{}| keeps {}", name, formal_args[0].name),
                );
                formal_args.truncate(1);
            }
            formal_args[0].kind = column_type.arg_kind();
        }
        let width = declaration.width.unwrap_or(DEFAULT_COLUMN_WIDTH);

        if self.loading() {
            let id = self.commit("declare_matrix_column", |sink| {
                sink.declare_matrix_column(&name, column_type, formal_args, variable_length, width)
            })?;
            log_debug!("Column declared", "name" => &name, "id" => id, "type" => format!("{:?}", column_type));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // SPREADSHEET-VARIABLE-DEFINITIONS>
    // ------------------------------------------------------------------

    fn parse_column_definition(&mut self) -> SystemResult<()> {
        let name = match self.item_name()? {
            Some((name, _)) => name,
            None => return self.abandon_item(),
        };
        let column = match self.sink.column_named(&name) {
            Some(column) => column.clone(),
            None => {
                self.warn(codes::semantic::UNKNOWN_COLUMN, &format!("|{}|", name));
                return self.abandon_item();
            }
        };

        self.push_context("column");
        self.parse_alist_body(COLUMN_DEFINITION_SCHEMA, |p, label| match label {
            AlistLabel::Cells => p.parse_item_list(label, |p| p.parse_cell(&column)),
            AlistLabel::Vocab => p.parse_vocab(&column),
            _ => p.discard_value(),
        })?;
        self.pop_context();
        self.close_entry()
    }

    /// `( (ONSET> t) (OFFSET> t) ( |<farg>| value ) ... )`
    fn parse_cell(&mut self, column: &ColumnDecl) -> SystemResult<()> {
        self.advance()?;
        let mut tracker = AlistTracker::new(CELL_SCHEMA);
        let mut onset = None;
        let mut offset = None;
        let mut values: Vec<ParsedValue> = Vec::with_capacity(column.formal_args.len());
        let mut excess_reported = false;
        let context = ValueContext {
            cell_value: !column.column_type.is_matrix(),
            in_query: false,
        };

        loop {
            if self.halted() {
                return Ok(());
            }
            if self.token().is_right_paren() {
                self.advance()?;
                break;
            }
            if self.token().is_eof() {
                self.unexpected("')' closing the cell");
                return Ok(());
            }
            if self.at_entry() {
                self.parse_alist_entry(&mut tracker, |p, label| {
                    match label {
                        AlistLabel::Onset => onset = p.time_attribute(label)?,
                        AlistLabel::Offset => offset = p.time_attribute(label)?,
                        _ => p.discard_value()?,
                    }
                    Ok(())
                })?;
                continue;
            }

            let farg_name = match (self.token(), self.peek1()) {
                (Token::LeftParen, Token::Symbol { text, flags }) if flags.is_formal_arg() => {
                    Some(text.clone())
                }
                _ => None,
            };
            let farg_name = match farg_name {
                Some(farg_name) => farg_name,
                None => {
                    let found = self.token().to_string();
                    self.warn(codes::syntax::UNEXPECTED_LIST_ITEM, &found);
                    self.skip_item()?;
                    continue;
                }
            };
            self.advance()?;
            self.advance()?;

            match column.formal_args.get(values.len()) {
                Some(farg) => {
                    if farg.name != farg_name {
                        self.warn(
                            codes::semantic::FARG_NAME_MISMATCH,
                            &format!("{} where {} expected", farg_name, farg.name),
                        );
                    }
                    let value = if self.at_value() {
                        self.parse_value(farg, context)?
                    } else {
                        if self.token().is_right_paren() {
                            self.warn(codes::syntax::MISSING_ALIST_VALUE, &farg_name);
                        }
                        ParsedValue::placeholder(farg)
                    };
                    values.push(value);
                }
                None if column.variable_length => {
                    let farg = FormalArg::untyped(farg_name.as_str());
                    let value = if self.at_value() {
                        self.parse_value(&farg, context)?
                    } else {
                        if self.token().is_right_paren() {
                            self.warn(codes::syntax::MISSING_ALIST_VALUE, &farg_name);
                        }
                        ParsedValue::placeholder(&farg)
                    };
                    values.push(value);
                }
                None => {
                    if !excess_reported {
                        self.warn(
                            codes::semantic::EXCESS_ARGS,
                            &format!("|{}| takes {}", column.name, column.formal_args.len()),
                        );
                        excess_reported = true;
                    }
                    self.discard_value()?;
                }
            }
            self.close_entry()?;
        }

        for label in tracker.finish() {
            self.load_error(codes::syntax::MISSING_REQUIRED_ENTRY, label.as_str());
        }

        let required = if column.variable_length { 1 } else { column.formal_args.len() };
        if values.len() < required {
            self.warn(
                codes::semantic::MISSING_ARGS,
                &format!(
                    "|{}| cell has {} of {} values",
                    column.name,
                    values.len(),
                    column.formal_args.len()
                ),
            );
            while values.len() < required {
                values.push(ParsedValue::placeholder(&column.formal_args[values.len()]));
            }
        }

        if self.loading() {
            let (onset, offset) = (onset.unwrap_or(0), offset.unwrap_or(0));
            self.commit("append_cell", |sink| sink.append_cell(column.id, onset, offset, values))?;
        }
        Ok(())
    }

    /// `( |name| ... )` naming predicates or columns usable in the column
    fn parse_vocab(&mut self, column: &ColumnDecl) -> SystemResult<()> {
        let label = AlistLabel::Vocab;
        if self.halted() || self.token().is_eof() {
            return Ok(());
        }
        if self.token().is_right_paren() {
            self.warn(codes::syntax::MISSING_ALIST_VALUE, label.as_str());
            return Ok(());
        }
        if !self.token().is_left_paren() {
            let found = self.token().kind_name();
            self.warn(
                codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
                &format!("{} expects a list, found {}", label.as_str(), found),
            );
            return self.skip_item();
        }
        self.advance()?;

        let mut vocab = Vec::new();
        loop {
            if self.halted() {
                return Ok(());
            }
            if self.token().is_right_paren() {
                self.advance()?;
                break;
            }
            if self.token().is_eof() {
                self.unexpected("')'");
                return Ok(());
            }
            let name = match self.token() {
                Token::Symbol { text, flags } if !flags.is_formal_arg() => Some(text.clone()),
                _ => None,
            };
            match name {
                Some(name) => {
                    let entry = match self.sink.predicate_named(&name) {
                        Some(predicate) => Some(VocabEntry::Predicate(predicate.id)),
                        None => self.sink.column_named(&name).map(|c| VocabEntry::Column(c.id)),
                    };
                    match entry {
                        Some(entry) => vocab.push(entry),
                        None => self.warn(codes::semantic::UNKNOWN_VOCAB_ENTRY, &format!("|{}|", name)),
                    }
                    self.advance()?;
                }
                None => {
                    let found = self.token().to_string();
                    self.warn(codes::syntax::UNEXPECTED_LIST_ITEM, &found);
                    self.skip_item()?;
                }
            }
        }

        if self.loading() {
            self.commit("set_column_vocab", |sink| sink.set_column_vocab(column.id, vocab))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::parse_user;
    use crate::logging::codes;
    use crate::semantic::{ArgKind, ColumnType, Value};
    use crate::sink::{DatabaseSink, VocabEntry};
    use assert_matches::assert_matches;

    const DECLS: &str = "(PREDICATE-DEFINITIONS> ( \
            (|hit| ( (VARIABLE-LENGTH> FALSE) (FORMAL-ARG-LIST> (|<who>| |<what>|)) )) )) \
        (SPREADSHEET-VARIABLE-DECLARATIONS> ( \
            (|trial| ( (TYPE> <<MATRIX>>) (VARIABLE-LENGTH> FALSE) (FORMAL-ARG-LIST> (|<n>| |<label>|)) (COLUMN-WIDTH> 250) )) \
            (|mood| ( (TYPE> <<NOMINAL>>) (FORMAL-ARG-LIST> (|<mood>|)) )) ))";

    fn with_definitions(definitions: &str) -> String {
        format!("{} (SPREADSHEET-VARIABLE-DEFINITIONS> ( {} ))", DECLS, definitions)
    }

    #[test]
    fn test_declarations_reach_the_sink() {
        let (db, diag) = parse_user(DECLS);
        assert_eq!(diag.warnings(), 0);
        assert_eq!(diag.errors(), 0);

        let hit = db.predicate_named("hit").unwrap();
        assert_eq!(hit.arity(), 2);
        assert!(!hit.variable_length);

        let trial = db.column_named("trial").unwrap();
        assert_eq!(trial.column_type, ColumnType::Matrix);
        assert_eq!(trial.width, 250);

        let mood = db.column_named("mood").unwrap();
        assert_eq!(mood.formal_args[0].kind, ArgKind::Nominal);
        assert_eq!(mood.width, 200);
    }

    #[test]
    fn test_duplicate_name_skipped() {
        let user = "(PREDICATE-DEFINITIONS> ( \
            (|p| (FORMAL-ARG-LIST> (|<a>|))) \
            (|p| (FORMAL-ARG-LIST> (|<a>| |<b>|))) ))";
        let (db, diag) = parse_user(user);
        assert_eq!(diag.count_of(codes::semantic::DUPLICATE_NAME), 1);
        assert_eq!(db.predicate_named("p").unwrap().arity(), 1);
    }

    #[test]
    fn test_system_predicate_name_is_taken() {
        let user = "(PREDICATE-DEFINITIONS> ( (|and| (FORMAL-ARG-LIST> (|<a>|))) ))";
        let (db, diag) = parse_user(user);
        assert_eq!(diag.count_of(codes::semantic::DUPLICATE_NAME), 1);
        assert_eq!(db.user_predicates().count(), 0);
    }

    #[test]
    fn test_empty_formal_arg_list_gets_placeholder() {
        let user = "(PREDICATE-DEFINITIONS> ( (|p| (FORMAL-ARG-LIST> ())) ))";
        let (db, diag) = parse_user(user);
        assert_eq!(diag.count_of(codes::semantic::EMPTY_FORMAL_ARG_LIST), 1);
        let p = db.predicate_named("p").unwrap();
        assert_eq!(p.formal_args[0].name, "<arg>");
    }

    #[test]
    fn test_missing_formal_arg_list_is_load_error() {
        let user = "(PREDICATE-DEFINITIONS> ( (|p| (VARIABLE-LENGTH> TRUE)) ))";
        let (db, diag) = parse_user(user);
        assert_eq!(diag.count_of(codes::syntax::MISSING_REQUIRED_ENTRY), 1);
        assert!(db.predicate_named("p").is_none());
    }

    #[test]
    fn test_non_matrix_column_rules() {
        let user = "(SPREADSHEET-VARIABLE-DECLARATIONS> ( \
            (|t| ( (TYPE> <<TEXT>>) (VARIABLE-LENGTH> TRUE) (FORMAL-ARG-LIST> (|<a>| |<b>|)) (COLUMN-WIDTH> 9000) )) ))";
        let (db, diag) = parse_user(user);
        assert_eq!(diag.count_of(codes::semantic::INVALID_VARIABLE_LENGTH), 1);
        assert_eq!(diag.count_of(codes::semantic::TOO_MANY_FORMAL_ARGS), 1);
        assert_eq!(diag.count_of(codes::semantic::VALUE_OUT_OF_RANGE), 1);
        let t = db.column_named("t").unwrap();
        assert_eq!(t.formal_args.len(), 1);
        assert_eq!(t.formal_args[0].kind, ArgKind::Text);
        assert!(!t.variable_length);
        assert_eq!(t.width, 1500);
    }

    #[test]
    fn test_cells_loaded_in_order() {
        let user = with_definitions(
            "(|trial| ( (CELLS> ( \
                ( (ONSET> (TIME> 60)) (OFFSET> 120) (|<n>| 1) (|<label>| |red|) ) \
                ( (ONSET> 120) (OFFSET> 180) (|<n>| 2.6) (|<label>| \"free text\") ) )) )) \
             (|mood| ( (CELLS> ( ( (ONSET> 0) (OFFSET> 10) (|<mood>| |a:b|) ) )) ))",
        );
        let (db, diag) = parse_user(&user);
        let trial = db.column_named("trial").unwrap().id;
        let cells: Vec<_> = db.cells_in(trial).collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].onset, 60);
        assert_eq!(cells[0].offset, 120);
        assert_eq!(cells[1].ord, 2);
        assert_matches!(&cells[1].value, Value::Matrix(args) if args[0].value == Value::Float(2.6));
        assert_matches!(&cells[1].value, Value::Matrix(args) if args[1].value == Value::QuoteString("free text".to_string()));
        assert_eq!(diag.warnings(), 0);
        assert_eq!(diag.errors(), 0);

        let mood = db.column_named("mood").unwrap().id;
        let cell = db.cells_in(mood).next().unwrap();
        assert_eq!(cell.value, Value::Nominal("a_b".to_string()));
    }

    #[test]
    fn test_cell_argument_problems() {
        let user = with_definitions(
            "(|trial| (CELLS> ( \
                ( (ONSET> 0) (OFFSET> 1) (|<x>| 5) ) \
                ( (ONSET> 0) (OFFSET> 1) (|<n>| 1) (|<label>| |a|) (|<extra>| 1) (|<more>| 2) ) )))",
        );
        let (db, diag) = parse_user(&user);
        assert_eq!(diag.count_of(codes::semantic::FARG_NAME_MISMATCH), 1);
        assert_eq!(diag.count_of(codes::semantic::MISSING_ARGS), 1);
        assert_eq!(diag.count_of(codes::semantic::EXCESS_ARGS), 1);

        let trial = db.column_named("trial").unwrap().id;
        let cells: Vec<_> = db.cells_in(trial).collect();
        assert_eq!(cells.len(), 2);
        match &cells[0].value {
            Value::Matrix(args) => {
                assert_eq!(args.len(), 2);
                assert_eq!(args[0].value, Value::Integer(5));
                assert!(args[1].is_undefined());
            }
            other => panic!("expected matrix, got {:?}", other),
        }
    }

    #[test]
    fn test_variable_length_cell_keeps_every_value() {
        let user = "(PREDICATE-DEFINITIONS> ( \
                (|p| ( (VARIABLE-LENGTH> TRUE) (FORMAL-ARG-LIST> (|<a>|)) )) )) \
            (SPREADSHEET-VARIABLE-DECLARATIONS> ( \
                (|m| ( (TYPE> <<MATRIX>>) (VARIABLE-LENGTH> TRUE) (FORMAL-ARG-LIST> (|<x>|)) )) )) \
            (SPREADSHEET-VARIABLE-DEFINITIONS> ( \
                (|m| (CELLS> ( ( (ONSET> 0) (OFFSET> 1) (|<x>| (|p| 1 2 3)) (|<y>| 4) ) ))) ))";
        let (db, diag) = parse_user(user);
        assert_eq!(diag.count_of(codes::semantic::EXCESS_ARGS), 0);
        assert_eq!(diag.warnings(), 0);

        let m = db.column_named("m").unwrap().id;
        let cell = db.cells_in(m).next().unwrap();
        match &cell.value {
            Value::Matrix(args) => {
                assert_eq!(args.len(), 2);
                assert_matches!(&args[0].value, Value::Predicate(p) if p.args.len() == 3);
                assert_eq!(args[1].farg, "<y>");
                assert_eq!(args[1].value, Value::Integer(4));
            }
            other => panic!("expected matrix, got {:?}", other),
        }
    }

    #[test]
    fn test_cell_missing_onset_is_load_error() {
        let user = with_definitions("(|trial| (CELLS> ( ( (OFFSET> 1) (|<n>| 1) (|<label>| |a|) ) )))");
        let (db, diag) = parse_user(&user);
        assert_eq!(diag.count_of(codes::syntax::MISSING_REQUIRED_ENTRY), 1);
        assert!(diag.stop_load());
        assert_eq!(db.cells().len(), 0);
    }

    #[test]
    fn test_unknown_column_definition_skipped() {
        let user = with_definitions("(|nope| (CELLS> ( ( (ONSET> 0) (OFFSET> 1) ) )))");
        let (db, diag) = parse_user(&user);
        assert_eq!(diag.count_of(codes::semantic::UNKNOWN_COLUMN), 1);
        assert_eq!(diag.errors(), 0);
        assert!(db.cells().is_empty());
    }

    #[test]
    fn test_vocab_resolves_predicates_and_columns() {
        let user = with_definitions("(|trial| (VOCAB> (|hit| |mood| |ghost|)))");
        let (db, diag) = parse_user(&user);
        assert_eq!(diag.count_of(codes::semantic::UNKNOWN_VOCAB_ENTRY), 1);
        let trial = db.column_named("trial").unwrap().id;
        let vocab = db.vocab_of(trial);
        assert_eq!(vocab.len(), 2);
        assert_matches!(vocab[0], VocabEntry::Predicate(_));
        assert_matches!(vocab[1], VocabEntry::Column(_));
    }

    #[test]
    fn test_time_out_of_range_clamps() {
        let user = with_definitions(
            "(|mood| (CELLS> ( ( (ONSET> (TIME> -5)) (OFFSET> 99999999) (|<mood>| |a|) ) )))",
        );
        let (db, diag) = parse_user(&user);
        assert_eq!(diag.count_of(codes::semantic::TIME_OUT_OF_RANGE), 2);
        let cell = &db.cells()[0];
        assert_eq!(cell.onset, 0);
        assert_eq!(cell.offset, crate::config::constants::format::MAX_TIME);
    }
}
