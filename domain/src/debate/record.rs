//! Result records handed to persistence

use super::mode::DebateMode;
use super::session::DebateStep;
use super::transcript::DebateTranscript;
use crate::core::choice::Choice;
use crate::core::question::LegalQuestion;
use serde::{Deserialize, Serialize};

/// Error category of a failed debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Generation,
    Parse,
    SchemaValidation,
    IllegalState,
    InvalidChoice,
    InconsistentRuling,
    InvalidQuestion,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Generation => "generation",
            FailureKind::Parse => "parse",
            FailureKind::SchemaValidation => "schema_validation",
            FailureKind::IllegalState => "illegal_state",
            FailureKind::InvalidChoice => "invalid_choice",
            FailureKind::InconsistentRuling => "inconsistent_ruling",
            FailureKind::InvalidQuestion => "invalid_question",
        }
    }

    /// Whether running the question again can change the outcome.
    ///
    /// Only remote failures qualify. Rule violations by a debater or the
    /// judge, and bad input, are final.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FailureKind::Generation | FailureKind::Parse | FailureKind::SchemaValidation
        )
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where and why a debate stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateFailure {
    pub step: DebateStep,
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DebateOutcome {
    Completed {
        transcript: DebateTranscript,
        /// `None` when the question carries no gold letter
        correct: Option<bool>,
    },
    Failed(DebateFailure),
}

/// One output record per question: a full transcript or a tagged failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateRecord {
    pub question_id: String,
    pub mode: DebateMode,
    #[serde(default)]
    pub gold_answer: Option<Choice>,
    pub outcome: DebateOutcome,
}

impl DebateRecord {
    pub fn completed(question: &LegalQuestion, transcript: DebateTranscript) -> Self {
        let correct = match (question.gold_answer, transcript.decision.choice()) {
            (Some(gold), Some(decided)) => Some(gold == decided),
            _ => None,
        };
        Self {
            question_id: question.id.clone(),
            mode: transcript.mode,
            gold_answer: question.gold_answer,
            outcome: DebateOutcome::Completed {
                transcript,
                correct,
            },
        }
    }

    pub fn failed(question: &LegalQuestion, mode: DebateMode, failure: DebateFailure) -> Self {
        Self {
            question_id: question.id.clone(),
            mode,
            gold_answer: question.gold_answer,
            outcome: DebateOutcome::Failed(failure),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, DebateOutcome::Completed { .. })
    }

    pub fn transcript(&self) -> Option<&DebateTranscript> {
        match &self.outcome {
            DebateOutcome::Completed { transcript, .. } => Some(transcript),
            DebateOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&DebateFailure> {
        match &self.outcome {
            DebateOutcome::Failed(failure) => Some(failure),
            DebateOutcome::Completed { .. } => None,
        }
    }

    pub fn is_correct(&self) -> Option<bool> {
        match &self.outcome {
            DebateOutcome::Completed { correct, .. } => *correct,
            DebateOutcome::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> LegalQuestion {
        LegalQuestion::multiple_choice(
            "q9",
            "Which remedy?",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
        )
        .with_gold_answer(Choice::C)
    }

    #[test]
    fn test_failed_record_serializes_tagged() {
        let record = DebateRecord::failed(
            &question(),
            DebateMode::Irac,
            DebateFailure {
                step: DebateStep::OpeningY,
                kind: FailureKind::SchemaValidation,
                message: "missing required field 'irac.rule'".into(),
            },
        );
        assert!(!record.is_completed());
        assert_eq!(record.is_correct(), None);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["question_id"], "q9");
        assert_eq!(value["mode"], "irac");
        assert_eq!(value["outcome"]["status"], "failed");
        assert_eq!(value["outcome"]["step"], "opening_y");
        assert_eq!(value["outcome"]["kind"], "schema_validation");
    }

    #[test]
    fn test_only_remote_failures_are_retryable() {
        assert!(FailureKind::Generation.is_retryable());
        assert!(FailureKind::Parse.is_retryable());
        assert!(FailureKind::SchemaValidation.is_retryable());
        assert!(!FailureKind::InvalidChoice.is_retryable());
        assert!(!FailureKind::IllegalState.is_retryable());
        assert!(!FailureKind::InconsistentRuling.is_retryable());
        assert!(!FailureKind::InvalidQuestion.is_retryable());
    }
}
