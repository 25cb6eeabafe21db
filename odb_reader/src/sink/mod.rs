//! Database sink
//!
//! [`DatabaseSink`] is the boundary between the reader and whatever stores
//! the database. [`MemoryDatabase`] is the stock implementation.

pub mod memory;
pub mod system;
pub mod traits;
pub mod types;

pub use memory::{DatabaseSummary, MemoryDatabase, StoredCell};
pub use traits::DatabaseSink;
pub use types::{
    CellId, ColumnDecl, ColumnId, DatabaseHeader, PredicateDecl, PredicateId, VocabEntry,
};
