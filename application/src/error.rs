//! Error taxonomy of a debate.

use crate::gateway::{GatewayError, GenerationError};
use mad_domain::{DomainError, FailureKind, ParseError, PayloadKind, SchemaViolation};
use thiserror::Error;

/// Any failure an agent call can end with
///
/// Generation and parse errors have already been retried by the gateway and
/// schema errors by the validation helper. State, choice and consistency
/// errors are never retried.
#[derive(Error, Debug, Clone)]
pub enum DebateError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Schema validation failed for {kind} after {attempts} attempts: {violation}\nLast response: {raw}")]
    SchemaValidation {
        kind: PayloadKind,
        violation: SchemaViolation,
        attempts: u32,
        raw: String,
    },

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Invalid choice '{value}' (expected one of {allowed})")]
    InvalidChoice { value: String, allowed: String },

    #[error("Inconsistent ruling: decision {decision} but {winner} argued {position}")]
    InconsistentRuling {
        decision: String,
        winner: String,
        position: String,
    },

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
}

impl DebateError {
    /// Category recorded in a failure record
    pub fn kind(&self) -> FailureKind {
        match self {
            DebateError::Generation(_) => FailureKind::Generation,
            DebateError::Parse(_) => FailureKind::Parse,
            DebateError::SchemaValidation { .. } => FailureKind::SchemaValidation,
            DebateError::IllegalState(_) => FailureKind::IllegalState,
            DebateError::InvalidChoice { .. } => FailureKind::InvalidChoice,
            DebateError::InconsistentRuling { .. } => FailureKind::InconsistentRuling,
            DebateError::InvalidQuestion(_) => FailureKind::InvalidQuestion,
        }
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        DebateError::IllegalState(message.into())
    }
}

impl From<DomainError> for DebateError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidChoice { value, allowed } => {
                DebateError::InvalidChoice { value, allowed }
            }
            DomainError::IllegalState(message) => DebateError::IllegalState(message),
            DomainError::InvalidQuestion(message) => DebateError::InvalidQuestion(message),
            DomainError::InconsistentRuling {
                decision,
                winner,
                position,
            } => DebateError::InconsistentRuling {
                decision,
                winner,
                position,
            },
        }
    }
}

impl From<GatewayError> for DebateError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Generation(e) => DebateError::Generation(e),
            GatewayError::Parse(e) => DebateError::Parse(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mad_domain::Choice;

    #[test]
    fn test_domain_errors_keep_their_kind() {
        let err: DebateError = DomainError::invalid_choice("E", &Choice::ALL).into();
        assert_eq!(err.kind(), FailureKind::InvalidChoice);
        assert_eq!(err.to_string(), "Invalid choice 'E' (expected one of A, B, C, D)");

        let err: DebateError = DomainError::illegal_state("rebuttal before opening").into();
        assert_eq!(err.kind(), FailureKind::IllegalState);
    }

    #[test]
    fn test_parse_error_kind() {
        let err: DebateError = GatewayError::Parse(ParseError {
            message: "expected value".into(),
            raw: "I cannot comply".into(),
        })
        .into();
        assert_eq!(err.kind(), FailureKind::Parse);
        assert!(err.to_string().contains("I cannot comply"));
    }
}
