use crate::diagnostics::SystemError;
use crate::file_processor::FileProcessorError;
use crate::logging::{codes, Code};

/// Faults that stop a load outright. Data problems in the file are
/// diagnostics on the report, never a `PipelineError`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Reader fault: {0}")]
    System(#[from] SystemError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(e) => e.error_code(),
            PipelineError::System(e) => e.error_code(),
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
