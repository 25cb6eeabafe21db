//! Consolidated diagnostic codes and classification system
//!
//! Single source of truth for every code the reader emits, together with its
//! behavioral metadata. Diagnostic records, log events and error enums all
//! carry one of these codes.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Warning codes start with `W`
    pub fn is_warning(&self) -> bool {
        self.0.starts_with('W')
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Code {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System fault codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File access codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Diagnostic limit codes
pub mod limits {
    use super::Code;

    pub const MAX_WARNINGS_EXCEEDED: Code = Code::new("E001");
    pub const LOAD_ABORTED: Code = Code::new("E002");
}

/// Lexical codes
pub mod lexical {
    use super::Code;

    pub const UNEXPECTED_EOF_IN_TOKEN: Code = Code::new("E020");
    pub const NEWLINE_IN_SYMBOL: Code = Code::new("E021");
    pub const ZERO_LENGTH_SYMBOL: Code = Code::new("E022");
    pub const UNTERMINATED_FORMAL_ARG: Code = Code::new("E023");
    pub const NUMBER_WITHOUT_DIGITS: Code = Code::new("E024");
    pub const UNKNOWN_TOKEN: Code = Code::new("E025");
    pub const MALFORMED_PRIVATE_VALUE: Code = Code::new("E026");
    pub const TOKEN_TOO_LONG: Code = Code::new("E027");

    pub const ILLEGAL_SYMBOL_CHAR: Code = Code::new("W020");
    pub const ILLEGAL_SYMBOL_ESCAPE: Code = Code::new("W021");
    pub const ILLEGAL_STRING_ESCAPE: Code = Code::new("W022");
    pub const BACKSPACE_IN_STRING: Code = Code::new("W023");
    pub const INTEGER_DIGITS_DISCARDED: Code = Code::new("W024");
    pub const FRACTION_DIGITS_DISCARDED: Code = Code::new("W025");
    pub const INTEGER_OUT_OF_RANGE: Code = Code::new("W026");
}

/// Grammar codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E040");
    pub const UNEXPECTED_EOF: Code = Code::new("E041");
    pub const MISSING_REQUIRED_ENTRY: Code = Code::new("E042");
    pub const MAX_PARSE_DEPTH_EXCEEDED: Code = Code::new("E043");

    pub const MISSING_ALIST_VALUE: Code = Code::new("W040");
    pub const ATTRIBUTE_VALUE_TYPE_MISMATCH: Code = Code::new("W041");
    pub const EXCESS_ALIST_VALUES: Code = Code::new("W042");
    pub const MISSING_RIGHT_PAREN: Code = Code::new("W043");
    pub const DUPLICATE_ALIST_ENTRY: Code = Code::new("W044");
    pub const UNKNOWN_ALIST_LABEL: Code = Code::new("W045");
    pub const ALIST_ENTRY_OUT_OF_ORDER: Code = Code::new("W046");
    pub const UNEXPECTED_LIST_ITEM: Code = Code::new("W047");
    pub const TRAILING_CONTENT: Code = Code::new("W048");
}

/// Value and vocabulary codes
pub mod semantic {
    use super::Code;

    pub const VALUE_TYPE_MISMATCH: Code = Code::new("W060");
    pub const EXCESS_ARGS: Code = Code::new("W061");
    pub const MISSING_ARGS: Code = Code::new("W062");
    pub const UNKNOWN_PREDICATE: Code = Code::new("W063");
    pub const UNKNOWN_COLUMN: Code = Code::new("W064");
    pub const RESERVED_NOMINAL: Code = Code::new("W065");
    pub const DUPLICATE_NAME: Code = Code::new("W066");
    pub const INVALID_NAME: Code = Code::new("W067");
    pub const DUPLICATE_FORMAL_ARG: Code = Code::new("W068");
    pub const EMPTY_FORMAL_ARG_LIST: Code = Code::new("W069");
    pub const FARG_NAME_MISMATCH: Code = Code::new("W070");
    pub const UNKNOWN_TYPE: Code = Code::new("W071");
    pub const VALUE_OUT_OF_RANGE: Code = Code::new("W072");
    pub const TIME_OUT_OF_RANGE: Code = Code::new("W073");
    pub const UNSUPPORTED_VERSION: Code = Code::new("W074");
    pub const UNKNOWN_VOCAB_ENTRY: Code = Code::new("W075");
    pub const TOO_MANY_FORMAL_ARGS: Code = Code::new("W076");
    pub const INVALID_VARIABLE_LENGTH: Code = Code::new("W077");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const LOAD_COMPLETE: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_READ_COMPLETE: Code = Code::new("I006");
    pub const SECTION_PARSED: Code = Code::new("I040");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

use Severity::{Critical, High, Low, Medium};

#[rustfmt::skip]
const METADATA: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new("ERR001", "System", Critical, false, true,
        "Internal reader fault", "File a bug report with the input that triggered it"),
    ErrorMetadata::new("ERR002", "System", Critical, false, true,
        "Reader initialization failed", "Check logging and configuration setup"),

    // File processing
    ErrorMetadata::new("E005", "FileProcessing", High, false, true,
        "Database file not found", "Check the file path"),
    ErrorMetadata::new("E006", "FileProcessing", Medium, true, true,
        "Database file has the wrong extension", "Rename the file to .odb or relax the extension preference"),
    ErrorMetadata::new("E007", "FileProcessing", High, false, true,
        "Database file exceeds the configured size limit", "Raise max_file_size in the build profile"),
    ErrorMetadata::new("E009", "FileProcessing", High, false, true,
        "Permission denied reading database file", "Check file permissions"),
    ErrorMetadata::new("E011", "FileProcessing", High, false, true,
        "I/O error reading database file", "Check the file system"),
    ErrorMetadata::new("E012", "FileProcessing", Medium, false, true,
        "Invalid database file path", "Pass a path to a regular file"),

    // Limits
    ErrorMetadata::new("E001", "Limits", High, false, true,
        "Too many warnings", "Fix the reported problems or raise MAX-WARNINGS>"),
    ErrorMetadata::new("E002", "Limits", High, false, true,
        "Load aborted", "Inspect the diagnostic listing"),

    // Lexical errors
    ErrorMetadata::new("E020", "Lexical", High, false, true,
        "End of input inside a token", "Check for a missing closing delimiter"),
    ErrorMetadata::new("E021", "Lexical", High, false, true,
        "Newline inside symbol", "Close the symbol with | before the end of the line"),
    ErrorMetadata::new("E022", "Lexical", High, false, true,
        "Zero length symbol", "Remove the empty || symbol"),
    ErrorMetadata::new("E023", "Lexical", High, false, true,
        "Unterminated formal argument", "Formal arguments are written |<name>|"),
    ErrorMetadata::new("E024", "Lexical", High, false, true,
        "Number without digits", "Check the numeric value"),
    ErrorMetadata::new("E025", "Lexical", High, false, true,
        "Unknown token", "Remove or quote the unrecognized text"),
    ErrorMetadata::new("E026", "Lexical", High, false, true,
        "Malformed private value", "Private values are written <<NAME>>"),
    ErrorMetadata::new("E027", "Lexical", High, false, true,
        "Token too long", "Shorten the token or raise max_token_length"),

    // Lexical warnings
    ErrorMetadata::new("W020", "Lexical", Low, true, false,
        "Illegal character in symbol replaced with '_'", "Remove the character from the symbol"),
    ErrorMetadata::new("W021", "Lexical", Low, true, false,
        "Illegal escape sequence in symbol replaced with '_'", "Only \\| and \\\\ may be escaped in symbols"),
    ErrorMetadata::new("W022", "Lexical", Low, true, false,
        "Illegal escape sequence in string replaced with '_'", "Only \\\" and \\\\ may be escaped in strings"),
    ErrorMetadata::new("W023", "Lexical", Low, true, false,
        "Backspace in string replaced with '_'", "Remove the backspace character"),
    ErrorMetadata::new("W024", "Lexical", Low, true, false,
        "Integer digits discarded", "The number is too large to represent"),
    ErrorMetadata::new("W025", "Lexical", Low, true, false,
        "Fraction digits discarded", "The number has more fractional digits than can be represented"),
    ErrorMetadata::new("W026", "Lexical", Low, true, false,
        "Integer out of range, clamped", "Integers must lie in -1000000000..=1000000000"),

    // Grammar errors
    ErrorMetadata::new("E040", "Syntax", High, false, true,
        "Unexpected token", "Check the database structure"),
    ErrorMetadata::new("E041", "Syntax", High, false, true,
        "Unexpected end of input", "The file appears truncated"),
    ErrorMetadata::new("E042", "Syntax", Medium, true, false,
        "Required attribute missing", "Add the attribute in its required position"),
    ErrorMetadata::new("E043", "Syntax", High, false, true,
        "Values nested too deeply", "Reduce nesting or raise max_parse_depth"),

    // Grammar warnings
    ErrorMetadata::new("W040", "Syntax", Low, true, false,
        "Attribute value missing, default used", "Supply a value for the attribute"),
    ErrorMetadata::new("W041", "Syntax", Low, true, false,
        "Attribute value has the wrong type, default used", "Check the attribute value"),
    ErrorMetadata::new("W042", "Syntax", Low, true, false,
        "Excess attribute values discarded", "Attributes take a single value"),
    ErrorMetadata::new("W043", "Syntax", Low, true, false,
        "Missing right parenthesis", "Close the attribute list"),
    ErrorMetadata::new("W044", "Syntax", Low, true, false,
        "Duplicate attribute discarded", "Remove the repeated attribute"),
    ErrorMetadata::new("W045", "Syntax", Low, true, false,
        "Unknown attribute discarded", "Remove the attribute"),
    ErrorMetadata::new("W046", "Syntax", Low, true, false,
        "Attribute out of order discarded", "Move the attribute to its required position"),
    ErrorMetadata::new("W047", "Syntax", Low, true, false,
        "Unexpected list item skipped", "Remove the item"),
    ErrorMetadata::new("W048", "Syntax", Low, true, false,
        "Content after end of database ignored", "Remove trailing text"),

    // Value and vocabulary warnings
    ErrorMetadata::new("W060", "Semantic", Low, true, false,
        "Value does not match its formal argument, placeholder used", "Check the value type"),
    ErrorMetadata::new("W061", "Semantic", Low, true, false,
        "Excess arguments discarded", "Remove the extra arguments"),
    ErrorMetadata::new("W062", "Semantic", Low, true, false,
        "Missing arguments filled with placeholders", "Supply all arguments"),
    ErrorMetadata::new("W063", "Semantic", Low, true, false,
        "Unknown predicate, empty predicate used", "Declare the predicate first"),
    ErrorMetadata::new("W064", "Semantic", Low, true, false,
        "Unknown column", "Declare the column first"),
    ErrorMetadata::new("W065", "Semantic", Low, true, false,
        "Nominal names a predicate or column, placeholder used", "Rename the nominal"),
    ErrorMetadata::new("W066", "Semantic", Low, true, false,
        "Name already in use, declaration skipped", "Use a unique name"),
    ErrorMetadata::new("W067", "Semantic", Low, true, false,
        "Invalid name", "Check the characters used in the name"),
    ErrorMetadata::new("W068", "Semantic", Low, true, false,
        "Duplicate formal argument skipped", "Use distinct formal argument names"),
    ErrorMetadata::new("W069", "Semantic", Low, true, false,
        "Empty formal argument list, placeholder argument added", "Declare at least one formal argument"),
    ErrorMetadata::new("W070", "Semantic", Low, true, false,
        "Formal argument name does not match declaration", "Check the cell argument names"),
    ErrorMetadata::new("W071", "Semantic", Low, true, false,
        "Unknown type, default used", "Use one of the documented private values"),
    ErrorMetadata::new("W072", "Semantic", Low, true, false,
        "Value out of range, clamped", "Check the attribute value"),
    ErrorMetadata::new("W073", "Semantic", Low, true, false,
        "Time out of range, clamped", "Times must lie between 00:00:00:00 and 59:59:59:59"),
    ErrorMetadata::new("W074", "Semantic", Low, true, false,
        "Unsupported database version", "Convert the file to version 1"),
    ErrorMetadata::new("W075", "Semantic", Low, true, false,
        "Unknown vocabulary entry skipped", "Declare the predicate first"),
    ErrorMetadata::new("W076", "Semantic", Low, true, false,
        "Too many formal arguments for column type, extras dropped", "Non-matrix columns take one formal argument"),
    ErrorMetadata::new("W077", "Semantic", Low, true, false,
        "Variable length ignored for column type", "Only matrix columns may be variable length"),

    // Success
    ErrorMetadata::new("I001", "Load", Low, true, false,
        "Database loaded", "No action needed"),
    ErrorMetadata::new("I004", "System", Low, true, false,
        "Logging initialized", "No action needed"),
    ErrorMetadata::new("I006", "FileProcessing", Low, true, false,
        "Database file read", "No action needed"),
    ErrorMetadata::new("I040", "Syntax", Low, true, false,
        "Section parsed", "No action needed"),
];

/// Registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

/// Initialize and get the registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        METADATA
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if a code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if a code requires an immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for a code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
