//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent content rule violations.
/// These are independent of how the content was loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("content not found: {0}")]
    NotFound(String),

    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),

    #[error("cycle detected in hierarchy: {0}")]
    CycleDetected(String),

    #[error("invalid cohort {name}: {message}")]
    InvalidCohort { name: String, message: String },
}

/// Error parsing an enumerated value (difficulty, tag, sort order).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseValueError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseValueError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
