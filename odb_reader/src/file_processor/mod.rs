//! File processor module with compile-time limits and global logging integration

mod processor;

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use crate::log_debug;
use crate::logging::codes;
use std::path::Path;

pub use processor::{FileContents, FileMetadata, FileProcessor, FileProcessorError};

/// Read a file with the given preferences
pub fn read_file(
    path: &Path,
    prefs: &FileProcessorPreferences,
) -> Result<FileContents, FileProcessorError> {
    FileProcessor::from_preferences(prefs).read(path)
}

/// Initialize file processor logging validation (for system startup)
pub fn init_file_processor_logging() -> Result<(), String> {
    let file_codes = [
        codes::file_processing::FILE_NOT_FOUND,
        codes::file_processing::INVALID_EXTENSION,
        codes::file_processing::FILE_TOO_LARGE,
        codes::file_processing::PERMISSION_DENIED,
        codes::file_processing::IO_ERROR,
        codes::file_processing::INVALID_PATH,
    ];

    for code in &file_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "File processor error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    log_debug!("File processor compile-time configuration loaded",
        "max_file_size" => MAX_FILE_SIZE,
        "large_file_threshold" => LARGE_FILE_THRESHOLD
    );
    Ok(())
}
