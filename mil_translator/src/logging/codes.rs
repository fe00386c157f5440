//! Error and success codes with their classification metadata.
//!
//! Single source of truth: every code the crate logs is declared here
//! together with its category, severity and recovery behavior.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Wrapper for both error and success codes.
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

/// Complete metadata for one code.
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E021");
}

pub mod generation {
    use super::Code;

    pub const UNKNOWN_OPERATION: Code = Code::new("E030");
    pub const INDEX_WITHOUT_BASE: Code = Code::new("E031");
    pub const STACK_UNDERFLOW: Code = Code::new("E032");
    pub const UNRESOLVED_TOKEN: Code = Code::new("E033");
}

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("E001");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I000");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I001");
    pub const GENERATION_COMPLETE: Code = Code::new("I002");
    pub const TRANSLATION_COMPLETE: Code = Code::new("I003");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

fn metadata_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    static REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let entries = [
            CodeMetadata {
                code: "E001",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                description: "Internal translator error",
            },
            CodeMetadata {
                code: "E020",
                category: "Lexical",
                severity: Severity::High,
                recoverable: false,
                description: "Unclassifiable character or operator sequence",
            },
            CodeMetadata {
                code: "E021",
                category: "Lexical",
                severity: Severity::High,
                recoverable: false,
                description: "Input ended inside an unfinished token",
            },
            CodeMetadata {
                code: "E030",
                category: "Generation",
                severity: Severity::High,
                recoverable: false,
                description: "Operation has no precedence entry",
            },
            CodeMetadata {
                code: "E031",
                category: "Generation",
                severity: Severity::High,
                recoverable: false,
                description: "Array element access without an identifier base",
            },
            CodeMetadata {
                code: "E032",
                category: "Generation",
                severity: Severity::High,
                recoverable: false,
                description: "Closer or boundary found no matching opener",
            },
            CodeMetadata {
                code: "E033",
                category: "Generation",
                severity: Severity::Critical,
                recoverable: false,
                description: "Token id has no symbol table entry",
            },
            CodeMetadata {
                code: "I000",
                category: "Success",
                severity: Severity::Low,
                recoverable: true,
                description: "Logging system initialized",
            },
            CodeMetadata {
                code: "I001",
                category: "Success",
                severity: Severity::Low,
                recoverable: true,
                description: "Lexical analysis completed",
            },
            CodeMetadata {
                code: "I002",
                category: "Success",
                severity: Severity::Low,
                recoverable: true,
                description: "RPN generation completed",
            },
            CodeMetadata {
                code: "I003",
                category: "Success",
                severity: Severity::Low,
                recoverable: true,
                description: "Translation pipeline completed",
            },
        ];
        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    metadata_registry().get(code)
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map_or("Unknown", |metadata| metadata.category)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code).map_or(Severity::Medium, |metadata| metadata.severity)
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code).map_or("Unknown code", |metadata| metadata.description)
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map_or(false, |metadata| metadata.recoverable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_code_has_metadata() {
        let declared = [
            system::INTERNAL_ERROR,
            lexical::INVALID_CHARACTER,
            lexical::UNEXPECTED_END_OF_INPUT,
            generation::UNKNOWN_OPERATION,
            generation::INDEX_WITHOUT_BASE,
            generation::STACK_UNDERFLOW,
            generation::UNRESOLVED_TOKEN,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::TOKENIZATION_COMPLETE,
            success::GENERATION_COMPLETE,
            success::TRANSLATION_COMPLETE,
        ];
        for code in declared {
            assert!(
                get_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn classification_accessors() {
        assert_eq!(get_category("E020"), "Lexical");
        assert_eq!(get_severity("E001"), Severity::Critical);
        assert!(!is_recoverable("E032"));
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_description("E999"), "Unknown code");
    }
}
