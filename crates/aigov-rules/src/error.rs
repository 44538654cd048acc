//! Rule evaluation error types.

use thiserror::Error;

/// Errors raised by the lifecycle and calculator rules.
///
/// Permission lookups never fail: unknown roles and permissions resolve to
/// empty results instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// Malformed or out-of-range input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A lifecycle transition was attempted from the wrong status.
    #[error("invalid state: cannot {action} {entity} {id} in status {status}")]
    InvalidState {
        entity: &'static str,
        id: String,
        status: String,
        action: &'static str,
    },
}

impl RulesError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RulesError::Validation(_) => "validation_error",
            RulesError::InvalidState { .. } => "invalid_state",
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        RulesError::Validation(msg.into())
    }
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RulesError>;
