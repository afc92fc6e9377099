//! Answers produced by baselines

use crate::core::choice::Choice;
use serde::{Deserialize, Serialize};

/// A baseline's answer: a letter for multiple choice, prose for essays.
///
/// Serialized tagged (`{"choice": "B"}` / `{"essay": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineAnswer {
    Choice(Choice),
    Essay(String),
}

impl BaselineAnswer {
    pub fn as_choice(&self) -> Option<Choice> {
        match self {
            BaselineAnswer::Choice(choice) => Some(*choice),
            BaselineAnswer::Essay(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BaselineAnswer::Choice(choice) => choice.as_str(),
            BaselineAnswer::Essay(text) => text,
        }
    }
}

impl std::fmt::Display for BaselineAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
