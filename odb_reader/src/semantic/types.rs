//! Formal arguments and parsed values

use crate::sink::{ColumnId, PredicateId};
use crate::tokens::PrivateValue;
use serde::Serialize;
use std::fmt;

/// Declared kind of a formal-argument slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArgKind {
    Float,
    Integer,
    Nominal,
    Text,
    Predicate,
    ColumnPredicate,
    TimeStamp,
    Untyped,
}

impl ArgKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Nominal => "nominal",
            Self::Text => "text",
            Self::Predicate => "predicate",
            Self::ColumnPredicate => "column predicate",
            Self::TimeStamp => "time stamp",
            Self::Untyped => "untyped",
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormalArg {
    /// Name including the angle brackets, e.g. `<onset>`
    pub name: String,
    pub kind: ArgKind,
}

impl FormalArg {
    pub fn new(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Untyped)
    }
}

/// Spreadsheet column type, named in the file by a private value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnType {
    Float,
    Integer,
    Matrix,
    Nominal,
    Predicate,
    Text,
}

impl ColumnType {
    pub fn from_private(value: PrivateValue) -> Option<Self> {
        match value {
            PrivateValue::Float => Some(Self::Float),
            PrivateValue::Integer => Some(Self::Integer),
            PrivateValue::Matrix => Some(Self::Matrix),
            PrivateValue::Nominal => Some(Self::Nominal),
            PrivateValue::Predicate => Some(Self::Predicate),
            PrivateValue::Text => Some(Self::Text),
            PrivateValue::Unknown => None,
        }
    }

    /// Kind of the single formal argument of a non-matrix column; matrix
    /// arguments are untyped
    pub fn arg_kind(self) -> ArgKind {
        match self {
            Self::Float => ArgKind::Float,
            Self::Integer => ArgKind::Integer,
            Self::Matrix => ArgKind::Untyped,
            Self::Nominal => ArgKind::Nominal,
            Self::Predicate => ArgKind::Predicate,
            Self::Text => ArgKind::Text,
        }
    }

    pub fn is_matrix(self) -> bool {
        self == Self::Matrix
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredicateValue {
    /// `None` for the empty predicate `()`
    pub predicate: Option<PredicateId>,
    pub name: String,
    pub args: Vec<ParsedValue>,
}

impl PredicateValue {
    pub fn empty() -> Self {
        Self {
            predicate: None,
            name: String::new(),
            args: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.predicate.is_none()
    }
}

/// Reference to a cell of a column, written like a predicate whose head is
/// the column name. The first three arguments are `<ord>`, `<onset>` and
/// `<offset>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnPredicateValue {
    pub column: ColumnId,
    pub name: String,
    pub args: Vec<ParsedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Float(f64),
    Integer(i64),
    Nominal(String),
    Text(String),
    QuoteString(String),
    Predicate(PredicateValue),
    ColumnPredicate(ColumnPredicateValue),
    Matrix(Vec<ParsedValue>),
    TimeStamp(i64),
    /// Unset slot, written in the file as the formal argument's own name
    Undefined,
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Integer(_) => "integer",
            Self::Nominal(_) => "nominal",
            Self::Text(_) => "text",
            Self::QuoteString(_) => "quote string",
            Self::Predicate(_) => "predicate",
            Self::ColumnPredicate(_) => "column predicate",
            Self::Matrix(_) => "matrix",
            Self::TimeStamp(_) => "time stamp",
            Self::Undefined => "undefined",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// A value together with the formal argument it fills
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedValue {
    pub farg: String,
    pub value: Value,
}

impl ParsedValue {
    pub fn new(farg: &FormalArg, value: Value) -> Self {
        Self {
            farg: farg.name.clone(),
            value,
        }
    }

    /// Stand-in for a missing or rejected value
    pub fn placeholder(farg: &FormalArg) -> Self {
        Self::new(farg, Value::Undefined)
    }

    pub fn is_undefined(&self) -> bool {
        self.value.is_undefined()
    }
}
