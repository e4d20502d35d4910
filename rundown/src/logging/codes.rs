//! Error and success codes with their classification metadata
//!
//! Every error type in the crate maps to one of these codes through its
//! `error_code()` method, and every code has a registry entry describing it.

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
// ERROR CLASSIFICATION TYPES
// ============================================================================

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

/// Complete metadata for one code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const INPUT_TOO_LONG: Code = Code::new("E021");
    pub const TOO_MANY_TOKENS: Code = Code::new("E022");
}

/// Structural parse error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E040");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E041");
    pub const INVALID_NUMBER: Code = Code::new("E042");
    pub const TOO_MANY_SECTIONS: Code = Code::new("E043");
}

/// Semantic rule violation codes
pub mod semantic {
    use super::Code;

    pub const COMPONENT_ORDER: Code = Code::new("E060");
    pub const EMPTY_SECTION: Code = Code::new("E061");
    pub const TARGET_ONLY_SECTION: Code = Code::new("E062");
    pub const RECOVERY_TARGET_NOT_ALLOWED: Code = Code::new("E063");
    pub const STATIC_RECOVERY_DISTANCE: Code = Code::new("E064");
    pub const TIME_FORMAT: Code = Code::new("E065");
    pub const ZERO_MULTIPLIER: Code = Code::new("E066");
}

/// Batch processing error codes
pub mod batch {
    use super::Code;

    pub const TOO_MANY_INPUTS: Code = Code::new("E080");
    pub const INPUT_FILE_UNREADABLE: Code = Code::new("E081");
    pub const WORKER_FAILURE: Code = Code::new("E082");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PARSE_COMPLETE: Code = Code::new("I040");
    pub const PIPELINE_COMPLETE: Code = Code::new("I070");
    pub const BATCH_COMPLETE: Code = Code::new("I080");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        true,
        "Critical internal error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        true,
        "Logging or runtime initialization failure",
        "Check that initialization runs once per process",
    ),
    ErrorMetadata::new(
        "ERR003",
        "System",
        Severity::High,
        true,
        "Runtime configuration could not be loaded",
        "Check the configuration file path and TOML syntax",
    ),
    // Lexical
    ErrorMetadata::new(
        "E020",
        "Lexical",
        Severity::High,
        true,
        "No token category matches the input at this offset",
        "Remove or replace the unrecognized character",
    ),
    ErrorMetadata::new(
        "E021",
        "Lexical",
        Severity::High,
        true,
        "Input exceeds the maximum accepted length",
        "Split the workout into smaller inputs",
    ),
    ErrorMetadata::new(
        "E022",
        "Lexical",
        Severity::High,
        true,
        "Input produces more tokens than allowed",
        "Split the workout into smaller inputs",
    ),
    // Syntax
    ErrorMetadata::new(
        "E040",
        "Syntax",
        Severity::High,
        true,
        "A required token is missing after a committed clause",
        "Check the clause around the reported offset",
    ),
    ErrorMetadata::new(
        "E041",
        "Syntax",
        Severity::High,
        true,
        "Input ended inside a clause",
        "Complete the clause before the end of the workout",
    ),
    ErrorMetadata::new(
        "E042",
        "Syntax",
        Severity::High,
        true,
        "Numeric literal cannot be represented",
        "Use a smaller number",
    ),
    ErrorMetadata::new(
        "E043",
        "Syntax",
        Severity::High,
        true,
        "Workout has more sections than allowed",
        "Split the workout into smaller inputs",
    ),
    // Semantic
    ErrorMetadata::new(
        "E060",
        "Semantic",
        Severity::Medium,
        true,
        "Section components are out of order or repeated",
        "Write components as action, metadata, target, recovery",
    ),
    ErrorMetadata::new(
        "E061",
        "Semantic",
        Severity::Medium,
        true,
        "Section has no components",
        "Remove the empty section or add an action",
    ),
    ErrorMetadata::new(
        "E062",
        "Semantic",
        Severity::Medium,
        true,
        "Section contains only a target",
        "Add the action the target applies to",
    ),
    ErrorMetadata::new(
        "E063",
        "Semantic",
        Severity::Medium,
        true,
        "Walk and static recoveries cannot carry a target",
        "Use a jog recovery or drop the target",
    ),
    ErrorMetadata::new(
        "E064",
        "Semantic",
        Severity::Medium,
        true,
        "Static recovery must be expressed as a time",
        "Replace the distance with a duration",
    ),
    ErrorMetadata::new(
        "E065",
        "Semantic",
        Severity::Medium,
        true,
        "Time literal has an invalid digit count or part count",
        "Write minutes and seconds after the leading unit with two digits",
    ),
    ErrorMetadata::new(
        "E066",
        "Semantic",
        Severity::Medium,
        true,
        "Repetition multiplier must be at least 1",
        "Use a positive multiplier",
    ),
    // Batch
    ErrorMetadata::new(
        "E080",
        "Batch",
        Severity::High,
        true,
        "Batch contains more inputs than allowed",
        "Split the batch",
    ),
    ErrorMetadata::new(
        "E081",
        "Batch",
        Severity::High,
        true,
        "Batch input file could not be read",
        "Check the file path and permissions",
    ),
    ErrorMetadata::new(
        "E082",
        "Batch",
        Severity::Critical,
        true,
        "A batch worker thread terminated abnormally",
        "Rerun sequentially to isolate the failing input",
    ),
    // Success
    ErrorMetadata::new(
        "I001",
        "System",
        Severity::Low,
        false,
        "Logging system initialized",
        "None",
    ),
    ErrorMetadata::new(
        "I020",
        "Lexical",
        Severity::Low,
        false,
        "Tokenization completed",
        "None",
    ),
    ErrorMetadata::new(
        "I040",
        "Syntax",
        Severity::Low,
        false,
        "Workout tree constructed",
        "None",
    ),
    ErrorMetadata::new(
        "I070",
        "Pipeline",
        Severity::Low,
        false,
        "Workout parsed end to end",
        "None",
    ),
    ErrorMetadata::new(
        "I080",
        "Batch",
        Severity::Low,
        false,
        "Batch parsing completed",
        "None",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
