// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    diagnostics: DiagnosticLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_token_length: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_parse_depth: usize,
    max_context_stack_depth: usize,
}

#[derive(serde::Deserialize)]
struct DiagnosticLimits {
    default_max_warnings: u32,
    default_max_errors: u32,
    max_warnings_ceiling: u32,
    max_errors_ceiling: u32,
    max_debug_level: u8,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_file: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=ODB_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=ODB_CONFIG_DIR");

    let profile = env::var("ODB_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("ODB_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of odb_reader directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_PARSE_DEPTH: usize = 4_096;
    // The wire format stores these limits in the header and caps them here.
    const FORMAT_MAX_WARNINGS: u32 = 99;
    const FORMAT_MAX_ERRORS: u32 = 10;
    const FORMAT_MAX_DEBUG_LEVEL: u8 = 3;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.file_processing.large_file_threshold > config.file_processing.max_file_size {
        panic!("LIMITS: large_file_threshold exceeds max_file_size");
    }

    if config.lexical.max_token_length == 0 {
        panic!("LIMITS: max_token_length must be positive");
    }

    if config.syntax.max_parse_depth == 0
        || config.syntax.max_parse_depth > ABSOLUTE_MAX_PARSE_DEPTH
    {
        panic!("LIMITS: max_parse_depth must be in 1..={}", ABSOLUTE_MAX_PARSE_DEPTH);
    }

    let diagnostics = &config.diagnostics;
    if diagnostics.max_warnings_ceiling == 0 || diagnostics.max_warnings_ceiling > FORMAT_MAX_WARNINGS
    {
        panic!("LIMITS: max_warnings_ceiling must be in 1..={}", FORMAT_MAX_WARNINGS);
    }
    if diagnostics.max_errors_ceiling == 0 || diagnostics.max_errors_ceiling > FORMAT_MAX_ERRORS {
        panic!("LIMITS: max_errors_ceiling must be in 1..={}", FORMAT_MAX_ERRORS);
    }
    if diagnostics.default_max_warnings == 0
        || diagnostics.default_max_warnings > diagnostics.max_warnings_ceiling
    {
        panic!("LIMITS: default_max_warnings must be in 1..=max_warnings_ceiling");
    }
    if diagnostics.default_max_errors == 0
        || diagnostics.default_max_errors > diagnostics.max_errors_ceiling
    {
        panic!("LIMITS: default_max_errors must be in 1..=max_errors_ceiling");
    }
    if diagnostics.max_debug_level > FORMAT_MAX_DEBUG_LEVEL {
        panic!("LIMITS: max_debug_level too high (max: {})", FORMAT_MAX_DEBUG_LEVEL);
    }

    if config.logging.max_log_events_per_file > config.logging.log_buffer_size {
        panic!("LIMITS: max_log_events_per_file exceeds log_buffer_size");
    }

    if profile == "production" && config.file_processing.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
    }}

    pub mod lexical {{
        pub const MAX_TOKEN_LENGTH: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_PARSE_DEPTH: usize = {};
        pub const MAX_CONTEXT_STACK_DEPTH: usize = {};
    }}

    pub mod diagnostics {{
        pub const DEFAULT_MAX_WARNINGS: u32 = {};
        pub const DEFAULT_MAX_ERRORS: u32 = {};
        pub const MAX_WARNINGS_CEILING: u32 = {};
        pub const MAX_ERRORS_CEILING: u32 = {};
        pub const MAX_DEBUG_LEVEL: u8 = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_FILE: usize = {};
    }}
}}
"#,
        profile,
        // File Processing
        config.file_processing.max_file_size,
        config.file_processing.large_file_threshold,
        // Lexical
        config.lexical.max_token_length,
        // Syntax
        config.syntax.max_parse_depth,
        config.syntax.max_context_stack_depth,
        // Diagnostics
        config.diagnostics.default_max_warnings,
        config.diagnostics.default_max_errors,
        config.diagnostics.max_warnings_ceiling,
        config.diagnostics.max_errors_ceiling,
        config.diagnostics.max_debug_level,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_file,
    );

    fs::write(output_path, constants_code).unwrap();
}
