//! Typed values and the rules for building them from tokens

pub mod builder;
pub mod types;

pub use builder::{build_atom, clamp_time, coerce_integer, sanitize_cell_nominal, ValueContext};
pub use types::{
    ArgKind, ColumnPredicateValue, ColumnType, FormalArg, ParsedValue, PredicateValue, Value,
};
