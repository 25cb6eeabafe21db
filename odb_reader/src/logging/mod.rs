//! Global logging for the ODB reader
//!
//! A process-wide `LoggingService` plus a thread-local file context that is
//! attached to every event logged while a file is being loaded.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

/// File currently being loaded on this thread
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(LoggingService::with_config());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::limits::MAX_WARNINGS_EXCEEDED,
        codes::lexical::UNKNOWN_TOKEN,
        codes::syntax::UNEXPECTED_TOKEN,
    ] {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Missing metadata for code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(FileProcessingContext::new(file_path, file_id));
    });
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with the file context set for this thread
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let result = f();
    clear_file_context();
    result
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn attach_file_context(event: LogEvent) -> LogEvent {
    if !config::include_file_context() {
        return event;
    }
    match get_current_file_context() {
        Some(file_ctx) => event
            .with_context("file", &file_ctx.file_path.display().to_string())
            .with_context("file_id", &file_ctx.file_id.to_string()),
        None => event,
    }
}

/// Send an event to the global logger, if one is installed
pub fn dispatch(event: LogEvent) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_file_context(event));
    }
}

fn with_pairs(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    event
}

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = with_pairs(LogEvent::error(code, message), context);
    if let Some(s) = span {
        event = event.with_span(s);
    }
    dispatch(event);
}

/// Used by `log_warning!` when a code is given
pub fn log_warning_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::warning_with_code(code, message), context));
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::success(code, message), context));
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::info(message), context));
}

/// Used by `log_debug!`
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::debug(message), context));
}

/// Error logging that falls back to stderr when logging is not initialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("test.odb");

        clear_file_context();
        assert!(get_current_file_context().is_none());

        set_file_context(file_path.clone(), 1);
        let context = get_current_file_context().unwrap();
        assert_eq!(context.file_path, file_path);
        assert_eq!(context.file_id, 1);

        clear_file_context();
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_with_file_context() {
        let file_path = PathBuf::from("test.odb");

        let result = with_file_context(file_path.clone(), 2, || {
            assert_eq!(get_current_file_context().unwrap().file_path, file_path);
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_attach_file_context() {
        let event = with_file_context(PathBuf::from("a.odb"), 3, || {
            attach_file_context(LogEvent::info("hello"))
        });
        if config::include_file_context() {
            assert_eq!(event.context.get("file").map(String::as_str), Some("a.odb"));
            assert_eq!(event.context.get("file_id").map(String::as_str), Some("3"));
        } else {
            assert!(event.context.is_empty());
        }
    }

    #[test]
    fn test_safe_logging_without_init() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }
}
