//! Error and success codes with their classification metadata
//!
//! Every stage error maps onto one of these codes through its `error_code()`
//! method; severity, category and recoverability are looked up here.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
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
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Input loading error codes
pub mod input {
    use super::Code;

    pub const INPUT_NOT_FOUND: Code = Code::new("E005");
    pub const INPUT_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const ATOM_TOO_LONG: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Terminal index mapping error codes
pub mod mapping {
    use super::Code;

    pub const UNKNOWN_TERMINAL_CLASS: Code = Code::new("E030");
    pub const DUPLICATE_TERMINAL_INDEX: Code = Code::new("E031");
}

/// Grammar table error codes
pub mod grammar {
    use super::Code;

    pub const EMPTY_ARITY_PATTERN: Code = Code::new("E060");
    pub const DUPLICATE_PRODUCTION: Code = Code::new("E061");
    pub const DUPLICATE_PRODUCTION_INDEX: Code = Code::new("E062");
    pub const INVALID_DEFINITION: Code = Code::new("E063");
    pub const DEFINITION_IO_ERROR: Code = Code::new("E064");
}

/// Parsing oracle error codes
pub mod oracle {
    use super::Code;

    pub const ORACLE_UNAVAILABLE: Code = Code::new("E070");
    pub const ORACLE_FAILED: Code = Code::new("E071");
    pub const MALFORMED_ORACLE_OUTPUT: Code = Code::new("E072");
    pub const UNKNOWN_PRODUCTION_INDEX: Code = Code::new("E073");
}

/// Tree construction error codes
pub mod builder {
    use super::Code;

    pub const MALFORMED_DERIVATION: Code = Code::new("E080");
    pub const TOKEN_UNDERFLOW: Code = Code::new("E081");
    pub const TRAILING_INPUT: Code = Code::new("E082");
    pub const DERIVATION_TOO_LONG: Code = Code::new("E086");
    pub const MAX_BUILD_DEPTH: Code = Code::new("E087");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const INPUT_LOADED: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const TERMINAL_MAPPING_COMPLETE: Code = Code::new("I030");
    pub const GRAMMAR_LOADED: Code = Code::new("I060");
    pub const ORACLE_PARSE_COMPLETE: Code = Code::new("I070");
    pub const TREE_CONSTRUCTION_COMPLETE: Code = Code::new("I080");
    pub const PIPELINE_COMPLETE: Code = Code::new("I090");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        "Internal error in the parsing pipeline",
        "Report the input that triggered the failure",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        "Logging or configuration could not be initialized",
        "Check LEFTPARSE_* environment variables",
    ),
    // Input
    ErrorMetadata::new(
        "E005",
        "Input",
        Severity::High,
        false,
        "Input file does not exist",
        "Check the input path",
    ),
    ErrorMetadata::new(
        "E007",
        "Input",
        Severity::High,
        false,
        "Input exceeds the configured size limit",
        "Split the input or build with a larger input.max_input_size",
    ),
    ErrorMetadata::new(
        "E009",
        "Input",
        Severity::High,
        false,
        "Permission denied while reading input",
        "Check file permissions",
    ),
    ErrorMetadata::new(
        "E010",
        "Input",
        Severity::Medium,
        false,
        "Input is not valid UTF-8",
        "Convert the input to UTF-8",
    ),
    ErrorMetadata::new(
        "E011",
        "Input",
        Severity::Medium,
        false,
        "I/O error while reading input",
        "Check the input source",
    ),
    // Lexical
    ErrorMetadata::new(
        "E020",
        "Lexical",
        Severity::Medium,
        false,
        "Character is not part of any token class",
        "Use only letters, digits, underscore, parentheses and whitespace",
    ),
    ErrorMetadata::new(
        "E023",
        "Lexical",
        Severity::Low,
        false,
        "Atom exceeds the maximum allowed length",
        "Shorten the atom or build with a larger lexical.max_atom_length",
    ),
    ErrorMetadata::new(
        "E027",
        "Lexical",
        Severity::High,
        false,
        "Input contains too many tokens",
        "Reduce input size or build with a larger lexical.max_token_count",
    ),
    // Mapping
    ErrorMetadata::new(
        "E030",
        "Mapping",
        Severity::High,
        false,
        "Terminal class has no index in the oracle alphabet",
        "Add the class to the [terminals] table of the grammar definition",
    ),
    ErrorMetadata::new(
        "E031",
        "Mapping",
        Severity::High,
        false,
        "Two terminal classes share one oracle index",
        "Give every terminal class a distinct index",
    ),
    // Grammar
    ErrorMetadata::new(
        "E060",
        "Grammar",
        Severity::High,
        false,
        "Production has an empty arity pattern",
        "Every arity pattern needs at least the leading terminal count",
    ),
    ErrorMetadata::new(
        "E061",
        "Grammar",
        Severity::High,
        false,
        "Production name defined more than once",
        "Remove the duplicate production",
    ),
    ErrorMetadata::new(
        "E062",
        "Grammar",
        Severity::High,
        false,
        "Production index assigned more than once",
        "Give every production a distinct index",
    ),
    ErrorMetadata::new(
        "E063",
        "Grammar",
        Severity::High,
        false,
        "Grammar definition is not valid TOML",
        "Fix the grammar definition file",
    ),
    ErrorMetadata::new(
        "E064",
        "Grammar",
        Severity::High,
        false,
        "Grammar definition could not be read",
        "Check the grammar definition path",
    ),
    // Oracle
    ErrorMetadata::new(
        "E070",
        "Oracle",
        Severity::Critical,
        false,
        "Parsing oracle could not be started",
        "Check the oracle program path",
    ),
    ErrorMetadata::new(
        "E071",
        "Oracle",
        Severity::High,
        false,
        "Parsing oracle rejected the input",
        "The input is likely not in the grammar's language",
    ),
    ErrorMetadata::new(
        "E072",
        "Oracle",
        Severity::High,
        false,
        "Parsing oracle produced unreadable output",
        "Check that the oracle emits production indices",
    ),
    ErrorMetadata::new(
        "E073",
        "Oracle",
        Severity::High,
        false,
        "Oracle emitted a production index the grammar does not define",
        "Make the oracle and the grammar agree on production indices",
    ),
    // Builder
    ErrorMetadata::new(
        "E080",
        "Builder",
        Severity::High,
        false,
        "Derivation ended before the tree was complete",
        "Check that the derivation matches the grammar",
    ),
    ErrorMetadata::new(
        "E081",
        "Builder",
        Severity::High,
        false,
        "Derivation required more tokens than the input provides",
        "Check that the derivation was produced for this token stream",
    ),
    ErrorMetadata::new(
        "E082",
        "Builder",
        Severity::High,
        false,
        "Derivation or tokens left over after the root node",
        "Check that the derivation was produced for this token stream",
    ),
    ErrorMetadata::new(
        "E086",
        "Builder",
        Severity::High,
        false,
        "Derivation exceeds the configured length limit",
        "Build with a larger builder.max_derivation_length",
    ),
    ErrorMetadata::new(
        "E087",
        "Builder",
        Severity::High,
        false,
        "Tree nesting exceeds the configured depth limit",
        "Build with a larger builder.max_build_depth",
    ),
    // Success
    ErrorMetadata::new(
        "I004",
        "System",
        Severity::Low,
        true,
        "Logging system initialized",
        "None",
    ),
    ErrorMetadata::new("I006", "Input", Severity::Low, true, "Input loaded", "None"),
    ErrorMetadata::new(
        "I020",
        "Lexical",
        Severity::Low,
        true,
        "Tokenization completed",
        "None",
    ),
    ErrorMetadata::new(
        "I030",
        "Mapping",
        Severity::Low,
        true,
        "Terminal classes mapped to oracle indices",
        "None",
    ),
    ErrorMetadata::new(
        "I060",
        "Grammar",
        Severity::Low,
        true,
        "Grammar table loaded",
        "None",
    ),
    ErrorMetadata::new(
        "I070",
        "Oracle",
        Severity::Low,
        true,
        "Oracle produced a derivation",
        "None",
    ),
    ErrorMetadata::new(
        "I080",
        "Builder",
        Severity::Low,
        true,
        "Parse tree reconstructed",
        "None",
    ),
    ErrorMetadata::new(
        "I090",
        "Pipeline",
        Severity::Low,
        true,
        "Input processed end to end",
        "None",
    ),
];

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
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

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
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
