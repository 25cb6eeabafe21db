//! Token model
//!
//! - [`Token`] with its symbol and string classification flags
//! - The sorted alist-label and private-value tables
//! - [`TokenWindow`], the three-slot lookahead the parser reads through

pub mod tables;
pub mod token;
pub mod window;

pub use tables::{AlistLabel, PrivateValue, ALIST_LABELS, PRIVATE_VALUES};
pub use token::{StringFlags, SymbolFlags, Token};
pub use window::TokenWindow;
