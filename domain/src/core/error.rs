//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid choice '{value}' (expected one of {allowed})")]
    InvalidChoice { value: String, allowed: String },

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Inconsistent ruling: decision {decision} but {winner} argued {position}")]
    InconsistentRuling {
        decision: String,
        winner: String,
        position: String,
    },
}

impl DomainError {
    /// Build an [`DomainError::InvalidChoice`] for a value outside `allowed`.
    pub fn invalid_choice(value: impl Into<String>, allowed: &[crate::Choice]) -> Self {
        DomainError::InvalidChoice {
            value: value.into(),
            allowed: allowed
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        DomainError::IllegalState(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Choice;

    #[test]
    fn test_invalid_choice_display() {
        let error = DomainError::invalid_choice("E", &Choice::ALL);
        assert_eq!(
            error.to_string(),
            "Invalid choice 'E' (expected one of A, B, C, D)"
        );
    }

    #[test]
    fn test_illegal_state_display() {
        let error = DomainError::illegal_state("rebuttal before opening");
        assert_eq!(error.to_string(), "Illegal state: rebuttal before opening");
    }
}
