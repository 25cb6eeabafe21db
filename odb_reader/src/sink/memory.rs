//! In-memory database used by the CLI and the tests

use super::system::SYSTEM_PREDICATES;
use super::traits::DatabaseSink;
use super::types::{
    CellId, ColumnDecl, ColumnId, DatabaseHeader, PredicateDecl, PredicateId, VocabEntry,
};
use crate::diagnostics::{SystemError, SystemResult};
use crate::semantic::{ColumnType, FormalArg, ParsedValue, Value};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameRef {
    Predicate(PredicateId),
    Column(ColumnId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredCell {
    pub id: CellId,
    pub column: ColumnId,
    /// 1-based position within the column
    pub ord: u32,
    pub onset: i64,
    pub offset: i64,
    pub value: Value,
}

/// Counts for reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseSummary {
    pub name: Option<String>,
    pub system_predicates: usize,
    pub user_predicates: usize,
    pub columns: usize,
    pub cells: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryDatabase {
    header: Option<DatabaseHeader>,
    predicates: Vec<PredicateDecl>,
    columns: Vec<ColumnDecl>,
    cells: Vec<StoredCell>,
    vocab: Vec<(ColumnId, Vec<VocabEntry>)>,
    pane_order: Vec<ColumnId>,
    #[serde(skip)]
    names: HashMap<String, NameRef>,
}

impl MemoryDatabase {
    /// Empty database holding only the system predicates
    pub fn new() -> Self {
        let mut db = Self::empty();
        for (name, fargs, variable_length) in SYSTEM_PREDICATES {
            let formal_args = fargs.iter().map(|f| FormalArg::untyped(*f)).collect();
            db.insert_predicate(name, formal_args, *variable_length, true);
        }
        db
    }

    /// Database without system predicates
    pub fn empty() -> Self {
        Self {
            header: None,
            predicates: Vec::new(),
            columns: Vec::new(),
            cells: Vec::new(),
            vocab: Vec::new(),
            pane_order: Vec::new(),
            names: HashMap::new(),
        }
    }

    fn insert_predicate(
        &mut self,
        name: &str,
        formal_args: Vec<FormalArg>,
        variable_length: bool,
        system: bool,
    ) -> PredicateId {
        let id = PredicateId(self.predicates.len() as u32);
        self.predicates.push(PredicateDecl {
            id,
            name: name.to_string(),
            formal_args,
            variable_length,
            system,
        });
        self.names.insert(name.to_string(), NameRef::Predicate(id));
        id
    }

    fn check_new_name(&self, operation: &'static str, name: &str) -> SystemResult<()> {
        if name.is_empty() {
            return Err(SystemError::sink(operation, "empty name"));
        }
        if self.names.contains_key(name) {
            return Err(SystemError::sink(
                operation,
                format!("name '{}' already in use", name),
            ));
        }
        Ok(())
    }

    fn column_index(&self, operation: &'static str, column: ColumnId) -> SystemResult<usize> {
        let index = column.0 as usize;
        if index < self.columns.len() {
            Ok(index)
        } else {
            Err(SystemError::sink(operation, format!("unknown column {}", column)))
        }
    }

    pub fn header(&self) -> Option<&DatabaseHeader> {
        self.header.as_ref()
    }

    pub fn predicates(&self) -> &[PredicateDecl] {
        &self.predicates
    }

    pub fn user_predicates(&self) -> impl Iterator<Item = &PredicateDecl> {
        self.predicates.iter().filter(|p| !p.system)
    }

    pub fn predicate(&self, id: PredicateId) -> Option<&PredicateDecl> {
        self.predicates.get(id.0 as usize)
    }

    pub fn columns(&self) -> &[ColumnDecl] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&ColumnDecl> {
        self.columns.get(id.0 as usize)
    }

    pub fn cells(&self) -> &[StoredCell] {
        &self.cells
    }

    pub fn cells_in(&self, column: ColumnId) -> impl Iterator<Item = &StoredCell> {
        self.cells.iter().filter(move |c| c.column == column)
    }

    pub fn vocab_of(&self, column: ColumnId) -> &[VocabEntry] {
        self.vocab
            .iter()
            .find(|(id, _)| *id == column)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn pane_order(&self) -> &[ColumnId] {
        &self.pane_order
    }

    pub fn summary(&self) -> DatabaseSummary {
        let system_predicates = self.predicates.iter().filter(|p| p.system).count();
        DatabaseSummary {
            name: self.header.as_ref().and_then(|h| h.name.clone()),
            system_predicates,
            user_predicates: self.predicates.len() - system_predicates,
            columns: self.columns.len(),
            cells: self.cells.len(),
        }
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseSink for MemoryDatabase {
    fn declare_predicate(
        &mut self,
        name: &str,
        formal_args: Vec<FormalArg>,
        variable_length: bool,
    ) -> SystemResult<PredicateId> {
        self.check_new_name("declare_predicate", name)?;
        if formal_args.is_empty() {
            return Err(SystemError::sink(
                "declare_predicate",
                format!("predicate '{}' has no formal arguments", name),
            ));
        }
        Ok(self.insert_predicate(name, formal_args, variable_length, false))
    }

    fn declare_matrix_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        formal_args: Vec<FormalArg>,
        variable_length: bool,
        width: u32,
    ) -> SystemResult<ColumnId> {
        self.check_new_name("declare_matrix_column", name)?;
        if formal_args.is_empty() || (!column_type.is_matrix() && formal_args.len() != 1) {
            return Err(SystemError::sink(
                "declare_matrix_column",
                format!(
                    "column '{}' has {} formal arguments",
                    name,
                    formal_args.len()
                ),
            ));
        }

        let id = ColumnId(self.columns.len() as u32);
        self.columns.push(ColumnDecl {
            id,
            name: name.to_string(),
            column_type,
            formal_args,
            variable_length,
            width,
        });
        self.names.insert(name.to_string(), NameRef::Column(id));
        Ok(id)
    }

    fn append_cell(
        &mut self,
        column: ColumnId,
        onset: i64,
        offset: i64,
        values: Vec<ParsedValue>,
    ) -> SystemResult<CellId> {
        let index = self.column_index("append_cell", column)?;
        let decl = &self.columns[index];

        let value = if decl.column_type.is_matrix() {
            Value::Matrix(values)
        } else {
            let mut values = values.into_iter();
            match (values.next(), values.next()) {
                (Some(single), None) => single.value,
                _ => {
                    return Err(SystemError::sink(
                        "append_cell",
                        format!("column '{}' takes exactly one value", decl.name),
                    ))
                }
            }
        };

        let ord = self.cells_in(column).count() as u32 + 1;
        let id = CellId(self.cells.len() as u32);
        self.cells.push(StoredCell {
            id,
            column,
            ord,
            onset,
            offset,
            value,
        });
        Ok(id)
    }

    fn predicate_named(&self, name: &str) -> Option<&PredicateDecl> {
        match self.names.get(name) {
            Some(NameRef::Predicate(id)) => self.predicate(*id),
            _ => None,
        }
    }

    fn column_named(&self, name: &str) -> Option<&ColumnDecl> {
        match self.names.get(name) {
            Some(NameRef::Column(id)) => self.column(*id),
            _ => None,
        }
    }

    fn is_name_in_use(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    fn record_header(&mut self, header: &DatabaseHeader) -> SystemResult<()> {
        self.header = Some(header.clone());
        Ok(())
    }

    fn set_column_vocab(&mut self, column: ColumnId, vocab: Vec<VocabEntry>) -> SystemResult<()> {
        self.column_index("set_column_vocab", column)?;
        self.vocab.retain(|(id, _)| *id != column);
        self.vocab.push((column, vocab));
        Ok(())
    }

    fn set_pane_order(&mut self, columns: Vec<ColumnId>) -> SystemResult<()> {
        for column in &columns {
            self.column_index("set_pane_order", *column)?;
        }
        self.pane_order = columns;
        Ok(())
    }
}
