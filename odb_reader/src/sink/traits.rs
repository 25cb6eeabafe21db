//! The database the reader loads into

use super::types::{
    CellId, ColumnDecl, ColumnId, DatabaseHeader, PredicateDecl, PredicateId, VocabEntry,
};
use crate::diagnostics::SystemResult;
use crate::semantic::{ColumnType, FormalArg, ParsedValue};

/// Receiver of everything a load produces.
///
/// The reader resolves name clashes and value shapes before calling in, so
/// an `Err` from any mutation means the reader and the sink disagree about
/// the database state. That is a fault, not a data problem.
pub trait DatabaseSink {
    fn declare_predicate(
        &mut self,
        name: &str,
        formal_args: Vec<FormalArg>,
        variable_length: bool,
    ) -> SystemResult<PredicateId>;

    fn declare_matrix_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        formal_args: Vec<FormalArg>,
        variable_length: bool,
        width: u32,
    ) -> SystemResult<ColumnId>;

    /// For matrix columns `values` holds one entry per formal argument, for
    /// every other column type exactly one entry.
    fn append_cell(
        &mut self,
        column: ColumnId,
        onset: i64,
        offset: i64,
        values: Vec<ParsedValue>,
    ) -> SystemResult<CellId>;

    fn predicate_named(&self, name: &str) -> Option<&PredicateDecl>;

    fn column_named(&self, name: &str) -> Option<&ColumnDecl>;

    fn is_name_in_use(&self, name: &str) -> bool {
        self.predicate_named(name).is_some() || self.column_named(name).is_some()
    }

    fn record_header(&mut self, _header: &DatabaseHeader) -> SystemResult<()> {
        Ok(())
    }

    fn set_column_vocab(&mut self, _column: ColumnId, _vocab: Vec<VocabEntry>) -> SystemResult<()> {
        Ok(())
    }

    fn set_pane_order(&mut self, _columns: Vec<ColumnId>) -> SystemResult<()> {
        Ok(())
    }
}
