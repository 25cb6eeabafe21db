/// Check that every stage's codes are registered before the first load
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating reader pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;
    crate::syntax::init_syntax_logging()?;

    for code in [
        crate::logging::codes::limits::MAX_WARNINGS_EXCEEDED,
        crate::logging::codes::limits::LOAD_ABORTED,
        crate::logging::codes::success::LOAD_COMPLETE,
    ] {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Pipeline code {} not found in metadata registry", code));
        }
    }

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Reader pipeline validation succeeded",
        "profile" => crate::config::build_info::profile(),
        "limits" => crate::config::build_info::source_info()
    );
    Ok(())
}
