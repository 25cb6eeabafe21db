//! `QUERY>` and `SYSTEM>` sections

use super::alist::AlistSchema;
use super::parser::OdbParser;
use crate::config::constants::format::{DEFAULT_COLUMN_WIDTH, QUERY_FARG_NAME, QUERY_VAR_NAME};
use crate::diagnostics::SystemResult;
use crate::log_debug;
use crate::logging::codes;
use crate::semantic::{ArgKind, ColumnType, FormalArg, ParsedValue, ValueContext};
use crate::sink::ColumnId;
use crate::tokens::{AlistLabel, Token};

const SYSTEM_SCHEMA: &AlistSchema = &[
    (AlistLabel::ShapaPaneVars, false),
    (AlistLabel::Groups, false),
    (AlistLabel::ImportFormatList, false),
    (AlistLabel::Alignments, false),
];

impl<'a, 's> OdbParser<'a, 's> {
    /// `( rule ... )`; every value becomes a cell of the query column
    pub(super) fn parse_query(&mut self) -> SystemResult<()> {
        self.push_context("query");
        self.parse_query_rules()?;
        self.section_done(AlistLabel::Query);
        self.pop_context();
        Ok(())
    }

    fn parse_query_rules(&mut self) -> SystemResult<()> {
        if self.halted() || self.token().is_eof() {
            return Ok(());
        }
        if self.token().is_right_paren() {
            self.warn(codes::syntax::MISSING_ALIST_VALUE, AlistLabel::Query.as_str());
            return Ok(());
        }
        if !self.token().is_left_paren() {
            let found = self.token().kind_name();
            self.warn(
                codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
                &format!("QUERY> expects a list, found {}", found),
            );
            return self.skip_item();
        }
        self.advance()?;

        let farg = FormalArg::new(QUERY_FARG_NAME, ArgKind::Predicate);
        let context = ValueContext {
            cell_value: false,
            in_query: true,
        };
        loop {
            if self.halted() {
                return Ok(());
            }
            if self.token().is_right_paren() {
                return self.advance();
            }
            if self.token().is_eof() {
                self.unexpected("')' closing the query list");
                return Ok(());
            }
            let value = self.parse_value(&farg, context)?;
            self.append_query_cell(value)?;
        }
    }

    fn append_query_cell(&mut self, value: ParsedValue) -> SystemResult<()> {
        if !self.loading() {
            return Ok(());
        }
        let column = match self.query_column()? {
            Some(column) => column,
            None => return Ok(()),
        };
        self.commit("append_cell", |sink| sink.append_cell(column, 0, 0, vec![value]))?;
        Ok(())
    }

    /// The query column, declared the first time a rule needs it
    fn query_column(&mut self) -> SystemResult<Option<ColumnId>> {
        if let Some(column) = self.sink.column_named(QUERY_VAR_NAME) {
            return Ok(Some(column.id));
        }
        if self.sink.is_name_in_use(QUERY_VAR_NAME) {
            self.warn(codes::semantic::DUPLICATE_NAME, QUERY_VAR_NAME);
            return Ok(None);
        }
        let formal_args = vec![FormalArg::new(QUERY_FARG_NAME, ArgKind::Predicate)];
        let id = self.commit("declare_matrix_column", |sink| {
            sink.declare_matrix_column(
                QUERY_VAR_NAME,
                ColumnType::Matrix,
                formal_args,
                false,
                DEFAULT_COLUMN_WIDTH,
            )
        })?;
        log_debug!("Query column declared", "id" => id);
        Ok(Some(id))
    }

    pub(super) fn parse_system(&mut self) -> SystemResult<()> {
        self.push_context("system");
        self.parse_alist_body(SYSTEM_SCHEMA, |p, label| match label {
            AlistLabel::ShapaPaneVars => p.parse_pane_vars(),
            _ => {
                if p.preferences.log_skipped_entries {
                    log_debug!("Skipping system entry",
                        "label" => label.as_str(),
                        "line" => p.line()
                    );
                }
                p.discard_value()
            }
        })?;
        self.section_done(AlistLabel::System);
        self.pop_context();
        Ok(())
    }

    /// `( |column| ... )` giving the spreadsheet pane order
    fn parse_pane_vars(&mut self) -> SystemResult<()> {
        if self.halted() || self.token().is_eof() {
            return Ok(());
        }
        if self.token().is_right_paren() {
            self.warn(
                codes::syntax::MISSING_ALIST_VALUE,
                AlistLabel::ShapaPaneVars.as_str(),
            );
            return Ok(());
        }
        if !self.token().is_left_paren() {
            let found = self.token().kind_name();
            self.warn(
                codes::syntax::ATTRIBUTE_VALUE_TYPE_MISMATCH,
                &format!("SHAPA-PANE-VARS> expects a list, found {}", found),
            );
            return self.skip_item();
        }
        self.advance()?;

        let mut columns = Vec::new();
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
                    match self.sink.column_named(&name).map(|c| c.id) {
                        Some(id) => columns.push(id),
                        None => self.warn(codes::semantic::UNKNOWN_COLUMN, &format!("|{}|", name)),
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
            self.commit("set_pane_order", |sink| sink.set_pane_order(columns))?;
        }
        Ok(())
    }
}
