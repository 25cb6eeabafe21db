//! File reading with compile-time size limits and global logging

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .odb, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

/// What was learned about the file before reading it
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub path: PathBuf,
    pub size: u64,
    /// Lower-cased extension, if any
    pub extension: Option<String>,
    pub is_odb_file: bool,
}

impl FileMetadata {
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

/// Raw file contents. Database files predate UTF-8, so no decoding is
/// attempted here.
#[derive(Debug, Clone)]
pub struct FileContents {
    pub bytes: Vec<u8>,
    pub metadata: FileMetadata,
    pub read_duration: Duration,
}

pub struct FileProcessor {
    pub require_odb_extension: bool,
    pub enable_performance_logging: bool,
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }
}

impl FileProcessor {
    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_odb_extension: prefs.require_odb_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_odb_extension_required(mut self, required: bool) -> Self {
        self.require_odb_extension = required;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    pub fn read(&self, file_path: &Path) -> Result<FileContents, FileProcessorError> {
        let start = Instant::now();
        let display = file_path.display().to_string();
        log_debug!("Reading database file", "file" => &display);

        let path = self.validate_path(file_path, &display)?;
        let metadata = self.metadata(&path)?;
        self.validate(&metadata, &display)?;

        let bytes = fs::read(&path).map_err(|e| {
            let error = io_error(&path, &e);
            log_error!(error.error_code(), "Failed to read file",
                "file" => &display,
                "io_error" => e
            );
            error
        })?;

        // the file may have grown since the metadata check
        if bytes.len() as u64 > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: bytes.len() as u64,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds maximum size", "file" => &display);
            return Err(error);
        }

        let contents = FileContents {
            bytes,
            metadata,
            read_duration: start.elapsed(),
        };
        self.log_success(&contents, &display);
        Ok(contents)
    }

    fn log_success(&self, contents: &FileContents, file: &str) {
        if self.enable_performance_logging {
            log_success!(codes::success::FILE_READ_COMPLETE, "File read",
                "file" => file,
                "size_bytes" => contents.metadata.size,
                "large_file" => contents.metadata.is_large_file(),
                "duration_ms" => format!("{:.2}", contents.read_duration.as_secs_f64() * 1000.0)
            );
        } else {
            log_success!(codes::success::FILE_READ_COMPLETE, "File read", "file" => file);
        }
    }

    fn validate_path(&self, path: &Path, display: &str) -> Result<PathBuf, FileProcessorError> {
        if path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: display.to_string(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }
        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: display.to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => display);
            return Err(error);
        }
        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: display.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => display);
            return Err(error);
        }
        path.canonicalize().map_err(|e| {
            let error = io_error(path, &e);
            log_error!(error.error_code(), "Failed to canonicalize path", "path" => display);
            error
        })
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = io_error(path, &e);
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display()
            );
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_odb_file = extension.as_deref() == Some("odb");

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            is_odb_file,
        })
    }

    fn validate(&self, metadata: &FileMetadata, display: &str) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size",
                "file" => display,
                "size_bytes" => metadata.size,
                "limit_bytes" => MAX_FILE_SIZE
            );
            return Err(error);
        }

        if self.require_odb_extension && !metadata.is_odb_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have the .odb extension",
                "file" => display,
                "extension" => metadata.extension.as_deref().unwrap_or("none")
            );
            return Err(error);
        }
        Ok(())
    }
}

fn io_error(path: &Path, error: &std::io::Error) -> FileProcessorError {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
            path: path.display().to_string(),
        },
        std::io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => FileProcessorError::IoError {
            message: format!("{}: {}", path.display(), error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_reads_raw_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("study.odb");
        fs::write(&path, b"( setf \xE9 )").unwrap();

        let contents = FileProcessor::default().read(&path).unwrap();
        assert_eq!(contents.bytes, b"( setf \xE9 )");
        assert!(contents.metadata.is_odb_file);
        assert_eq!(contents.metadata.size, 10);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::default().read(&dir.path().join("nope.odb"));
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::default().read(dir.path());
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("study.txt");
        fs::write(&path, "()").unwrap();

        assert!(FileProcessor::default()
            .with_odb_extension_required(false)
            .read(&path)
            .is_ok());
        let result = FileProcessor::default()
            .with_odb_extension_required(true)
            .read(&path);
        assert_matches!(
            result,
            Err(FileProcessorError::InvalidExtension { extension: Some(ref e) }) if e == "txt"
        );
    }

    #[test]
    fn test_error_codes() {
        let error = FileProcessorError::FileNotFound {
            path: "x.odb".to_string(),
        };
        assert_eq!(error.error_code().as_str(), "E005");
        assert_eq!(error.category(), codes::get_category("E005"));
    }
}
