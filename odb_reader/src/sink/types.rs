//! Identifiers and declarations handed across the sink boundary

use crate::semantic::{ColumnType, FormalArg};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PredicateId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellId(pub u32);

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pred#{}", self.0)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "col#{}", self.0)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredicateDecl {
    pub id: PredicateId,
    pub name: String,
    pub formal_args: Vec<FormalArg>,
    pub variable_length: bool,
    /// Built in rather than read from the file
    pub system: bool,
}

impl PredicateDecl {
    pub fn arity(&self) -> usize {
        self.formal_args.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDecl {
    pub id: ColumnId,
    pub name: String,
    pub column_type: ColumnType,
    pub formal_args: Vec<FormalArg>,
    pub variable_length: bool,
    pub width: u32,
}

/// Values from the `HEADER>` section after clamping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseHeader {
    pub name: Option<String>,
    pub version: i64,
    pub debug_level: Option<u8>,
    pub max_errors: Option<u32>,
    pub max_warnings: Option<u32>,
}

/// One entry of a column's vocabulary list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VocabEntry {
    Predicate(PredicateId),
    Column(ColumnId),
}
