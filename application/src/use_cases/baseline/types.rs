//! Records and errors shared by the baseline use cases.

use crate::gateway::GatewayError;
use mad_domain::{BaselineAnswer, BaselineMethod, Choice};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("No samples requested")]
    NoSamples,

    #[error("Every essay sample timed out")]
    NoUsableSamples,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Reply has no readable answer: {raw}")]
    MissingAnswer { raw: String },
}

/// One sampled answer of a self-consistency run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSample {
    pub answer: BaselineAnswer,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_citations: Vec<String>,
    /// True when the sample timed out and the letter was drawn at random
    #[serde(default)]
    pub fallback: bool,
}

/// Result of a baseline method on one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub question_id: String,
    pub method: BaselineMethod,
    pub answer: BaselineAnswer,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_citations: Vec<String>,
    /// Sampled answers (self-consistency only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<BaselineSample>,
    /// Votes behind the answer; 1 for one-shot methods
    pub majority_count: usize,
    #[serde(default)]
    pub fallback_count: usize,
    pub gold_answer: Option<Choice>,
    pub correct: Option<bool>,
}

impl BaselineRecord {
    /// Record for a one-shot method, scored against `gold_answer`
    pub fn single(
        question_id: impl Into<String>,
        method: BaselineMethod,
        answer: BaselineAnswer,
        gold_answer: Option<Choice>,
    ) -> Self {
        let correct = match (&answer, gold_answer) {
            (BaselineAnswer::Choice(choice), Some(gold)) => Some(*choice == gold),
            _ => None,
        };
        Self {
            question_id: question_id.into(),
            method,
            answer,
            reasoning: String::new(),
            key_citations: Vec::new(),
            samples: Vec::new(),
            majority_count: 1,
            fallback_count: 0,
            gold_answer,
            correct,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_key_citations(mut self, citations: Vec<String>) -> Self {
        self.key_citations = citations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_record_scores_letters_only() {
        let letter = BaselineRecord::single(
            "q1",
            BaselineMethod::Single,
            BaselineAnswer::Choice(Choice::B),
            Some(Choice::B),
        );
        assert_eq!(letter.correct, Some(true));
        assert_eq!(letter.majority_count, 1);

        let essay = BaselineRecord::single(
            "oab-1",
            BaselineMethod::Cot,
            BaselineAnswer::Essay("Yes.".into()),
            None,
        );
        assert_eq!(essay.correct, None);
    }

    #[test]
    fn test_record_json_omits_empty_fields() {
        let record = BaselineRecord::single(
            "q1",
            BaselineMethod::CotIrac,
            BaselineAnswer::Choice(Choice::D),
            None,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["method"], "cot-irac");
        assert_eq!(json["answer"]["choice"], "D");
        assert!(json.get("samples").is_none());
        assert!(json.get("reasoning").is_none());

        let back: BaselineRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
