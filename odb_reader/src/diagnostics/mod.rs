//! Diagnostic policy and the fault channel

pub mod error;
pub mod state;

pub use error::{SystemError, SystemResult};
pub use state::{Diagnostic, DiagnosticLimits, DiagnosticSeverity, DiagnosticState};
