//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed records and broken tree invariants.
/// Duplicate keys and missing keys are not errors at this level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("invalid contact id: {0:?}")]
    InvalidId(String),

    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),
}
