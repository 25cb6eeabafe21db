//! Fixed name tables for attribute labels and private values
//!
//! Both tables are kept in byte-wise sorted order and searched with a binary
//! search. The enum discriminants mirror the table indices, so adding a label
//! means inserting it in order and renumbering the enum to match.

use serde::Serialize;

pub const ALIST_LABELS: [&str; 25] = [
    "ALIGNMENTS>",
    "CELLS>",
    "COLUMN-WIDTH>",
    "DEBUG-LEVEL>",
    "FORMAL-ARG-LIST>",
    "GROUPS>",
    "HEADER>",
    "IMPORT-FORMAT-LIST>",
    "MAX-ERRORS>",
    "MAX-WARNINGS>",
    "NAME>",
    "OFFSET>",
    "ONSET>",
    "PREDICATE-DEFINITIONS>",
    "QUERY>",
    "SHAPA-PANE-VARS>",
    "SPREADSHEET-VARIABLE-DECLARATIONS>",
    "SPREADSHEET-VARIABLE-DEFINITIONS>",
    "SYSTEM>",
    "TIME>",
    "TYPE>",
    "USER>",
    "VARIABLE-LENGTH>",
    "VERSION>",
    "VOCAB>",
];

pub const PRIVATE_VALUES: [&str; 6] = [
    "<<FLOAT>>",
    "<<INTEGER>>",
    "<<MATRIX>>",
    "<<NOMINAL>>",
    "<<PREDICATE>>",
    "<<TEXT>>",
];

/// Index of `name` in `table`, or `table.len()` when absent
pub fn lookup(table: &[&str], name: &str) -> usize {
    table
        .binary_search_by(|probe| probe.as_bytes().cmp(name.as_bytes()))
        .unwrap_or(table.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlistLabel {
    Alignments = 0,
    Cells = 1,
    ColumnWidth = 2,
    DebugLevel = 3,
    FormalArgList = 4,
    Groups = 5,
    Header = 6,
    ImportFormatList = 7,
    MaxErrors = 8,
    MaxWarnings = 9,
    Name = 10,
    Offset = 11,
    Onset = 12,
    PredicateDefinitions = 13,
    Query = 14,
    ShapaPaneVars = 15,
    SpreadsheetVariableDeclarations = 16,
    SpreadsheetVariableDefinitions = 17,
    System = 18,
    Time = 19,
    Type = 20,
    User = 21,
    VariableLength = 22,
    Version = 23,
    Vocab = 24,
    Unknown = 25,
}

impl AlistLabel {
    const BY_INDEX: [AlistLabel; 25] = [
        AlistLabel::Alignments,
        AlistLabel::Cells,
        AlistLabel::ColumnWidth,
        AlistLabel::DebugLevel,
        AlistLabel::FormalArgList,
        AlistLabel::Groups,
        AlistLabel::Header,
        AlistLabel::ImportFormatList,
        AlistLabel::MaxErrors,
        AlistLabel::MaxWarnings,
        AlistLabel::Name,
        AlistLabel::Offset,
        AlistLabel::Onset,
        AlistLabel::PredicateDefinitions,
        AlistLabel::Query,
        AlistLabel::ShapaPaneVars,
        AlistLabel::SpreadsheetVariableDeclarations,
        AlistLabel::SpreadsheetVariableDefinitions,
        AlistLabel::System,
        AlistLabel::Time,
        AlistLabel::Type,
        AlistLabel::User,
        AlistLabel::VariableLength,
        AlistLabel::Version,
        AlistLabel::Vocab,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::BY_INDEX
            .get(index)
            .copied()
            .unwrap_or(AlistLabel::Unknown)
    }

    /// Resolve label text including the trailing `>`
    pub fn lookup(text: &str) -> Self {
        Self::from_index(lookup(&ALIST_LABELS, text))
    }

    pub fn as_str(&self) -> &'static str {
        ALIST_LABELS
            .get(*self as usize)
            .copied()
            .unwrap_or("<unknown label>")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrivateValue {
    Float = 0,
    Integer = 1,
    Matrix = 2,
    Nominal = 3,
    Predicate = 4,
    Text = 5,
    Unknown = 6,
}

impl PrivateValue {
    const BY_INDEX: [PrivateValue; 6] = [
        PrivateValue::Float,
        PrivateValue::Integer,
        PrivateValue::Matrix,
        PrivateValue::Nominal,
        PrivateValue::Predicate,
        PrivateValue::Text,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::BY_INDEX
            .get(index)
            .copied()
            .unwrap_or(PrivateValue::Unknown)
    }

    /// Resolve `<<NAME>>` text
    pub fn lookup(text: &str) -> Self {
        Self::from_index(lookup(&PRIVATE_VALUES, text))
    }

    pub fn as_str(&self) -> &'static str {
        PRIVATE_VALUES
            .get(*self as usize)
            .copied()
            .unwrap_or("<<UNKNOWN>>")
    }
}
