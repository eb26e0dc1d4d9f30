//! Hard-error plane (spec §7): malformed source text, missing imports, cycles,
//! recursion-limit overruns and fatal translator failures. Validation results
//! and friction reports are never represented here — they are structured
//! data, not errors.

use std::fmt;

/// A single line/column location within a source file, used to anchor parse
/// diagnostics. Rows and columns both start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub row: u32,
    pub col: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// Hard errors propagated as `Result::Err` per spec §7.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("{path}:{location}: {message}")]
    Parse {
        path: String,
        location: Location,
        message: String,
    },

    #[error("circular import: {0}")]
    CircularImport(String),

    #[error("import {namespace} -> {path} could not be read: {message}")]
    ImportNotFound {
        namespace: String,
        path: String,
        message: String,
    },

    #[error("recursion limit ({limit}) exceeded while {context}")]
    RecursionLimitExceeded { limit: u32, context: String },

    #[error("{translator}: malformed source: {message}")]
    TranslatorFatal { translator: String, message: String },

    #[error("unresolved reference used where a concrete schema was required: {0}")]
    UnresolvedReference(String),

    #[error("invalid {kind} literal {text:?}: {message}")]
    InvalidLiteral {
        kind: String,
        text: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
