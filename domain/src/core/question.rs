//! Legal question value object

use crate::core::choice::Choice;
use crate::core::error::DomainError;
use crate::debate::mode::DebateMode;
use serde::{Deserialize, Serialize};

/// A legal question to be debated (Value Object)
///
/// Loaded once by an external collaborator and read-only afterwards. The
/// gold fields are kept for scoring and never reach an agent prompt: agents
/// only see a [`QuestionPrompt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalQuestion {
    pub id: String,
    pub question: String,
    /// Fact pattern or preamble shown before the question
    #[serde(default, alias = "prompt")]
    pub context: Option<String>,
    /// Answer options, in `A..=D` order
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default, alias = "answer")]
    pub gold_answer: Option<Choice>,
    /// Law area (used by essay prompts)
    #[serde(default)]
    pub category: Option<String>,
    /// Gold essay answer (scoring only)
    #[serde(default)]
    pub reference_answer: Option<String>,
}

impl LegalQuestion {
    /// Create a multiple-choice question
    pub fn multiple_choice(
        id: impl Into<String>,
        question: impl Into<String>,
        choices: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            context: None,
            choices,
            gold_answer: None,
            category: None,
            reference_answer: None,
        }
    }

    /// Create an open-ended (essay) question
    pub fn open_ended(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            context: None,
            choices: Vec::new(),
            gold_answer: None,
            category: None,
            reference_answer: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_gold_answer(mut self, answer: Choice) -> Self {
        self.gold_answer = Some(answer);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_reference_answer(mut self, answer: impl Into<String>) -> Self {
        self.reference_answer = Some(answer.into());
        self
    }

    /// Check that this question can be debated in `mode`.
    pub fn validate_for(&self, mode: DebateMode) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidQuestion("id cannot be empty".into()));
        }
        if self.question.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(format!(
                "question {} has no text",
                self.id
            )));
        }
        if mode.is_multiple_choice() {
            if self.choices.len() != Choice::ALL.len() {
                return Err(DomainError::InvalidQuestion(format!(
                    "question {} has {} choices, expected {}",
                    self.id,
                    self.choices.len(),
                    Choice::ALL.len()
                )));
            }
            if let Some(index) = self.choices.iter().position(|c| c.trim().is_empty()) {
                return Err(DomainError::InvalidQuestion(format!(
                    "question {} has an empty choice at position {}",
                    self.id,
                    index + 1
                )));
            }
        }
        Ok(())
    }

    /// Whether the question offers answer choices
    pub fn is_multiple_choice(&self) -> bool {
        !self.choices.is_empty()
    }

    /// View of this question that is safe to show to agents
    pub fn prompt_view(&self) -> QuestionPrompt<'_> {
        QuestionPrompt {
            question: &self.question,
            context: self.context.as_deref().filter(|c| !c.trim().is_empty()),
            choices: &self.choices,
            category: self.category.as_deref(),
        }
    }
}

/// Agent-visible projection of a [`LegalQuestion`] (no gold data)
#[derive(Debug, Clone, Copy)]
pub struct QuestionPrompt<'a> {
    pub question: &'a str,
    pub context: Option<&'a str>,
    pub choices: &'a [String],
    pub category: Option<&'a str>,
}

impl QuestionPrompt<'_> {
    /// Context preamble followed by the question text
    pub fn full_question(&self) -> String {
        match self.context {
            Some(context) => format!("{}\n\n{}", context, self.question),
            None => self.question.to_string(),
        }
    }

    /// Choices rendered as `A) ...` lines
    pub fn choices_text(&self) -> String {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(i, text)| Choice::from_index(i).map(|c| format!("{}) {}", c, text)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<String> {
        ["W", "X", "Y", "Z"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mcq_validation() {
        let q = LegalQuestion::multiple_choice("q1", "Is the contract enforceable?", choices());
        assert!(q.validate_for(DebateMode::Irac).is_ok());

        let short = LegalQuestion::multiple_choice("q2", "Text", vec!["only".into()]);
        assert!(matches!(
            short.validate_for(DebateMode::Vanilla),
            Err(DomainError::InvalidQuestion(_))
        ));
    }

    #[test]
    fn test_open_ended_needs_no_choices() {
        let q = LegalQuestion::open_ended("oab-1", "Explain the liability.")
            .with_category("civil law")
            .with_reference_answer("Strict liability applies.");
        assert!(q.validate_for(DebateMode::OpenEnded).is_ok());
        assert!(q.validate_for(DebateMode::Irac).is_err());
        assert!(!q.is_multiple_choice());
        assert_eq!(q.reference_answer.as_deref(), Some("Strict liability applies."));
    }

    #[test]
    fn test_blank_question_rejected() {
        let q = LegalQuestion::multiple_choice("q1", "   ", choices());
        assert!(q.validate_for(DebateMode::Irac).is_err());
    }

    #[test]
    fn test_prompt_view_formats_choices_and_context() {
        let q = LegalQuestion::multiple_choice("q1", "Which applies?", choices())
            .with_context("Facts here.")
            .with_gold_answer(Choice::C);
        let view = q.prompt_view();
        assert_eq!(view.full_question(), "Facts here.\n\nWhich applies?");
        assert_eq!(view.choices_text(), "A) W\nB) X\nC) Y\nD) Z");
    }

    #[test]
    fn test_deserialize_dataset_aliases() {
        let json = r#"{"id":"7","question":"Q?","prompt":"ctx","choices":["a","b","c","d"],"answer":"B"}"#;
        let q: LegalQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.context.as_deref(), Some("ctx"));
        assert_eq!(q.gold_answer, Some(Choice::B));
    }
}
