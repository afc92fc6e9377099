//! Judge decisions

use super::argument::{Irac, optional_text, text_list};
use super::role::DebaterRole;
use crate::core::choice::Choice;
use crate::core::error::DomainError;
use crate::core::string::prefix_chars;
use crate::schema::payload::PayloadKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const RATIONALE_APPLICATION_LEN: usize = 200;

/// What the judge ruled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Choice(Choice),
    FinalAnswer(String),
}

impl Verdict {
    pub fn as_choice(&self) -> Option<Choice> {
        match self {
            Verdict::Choice(choice) => Some(*choice),
            Verdict::FinalAnswer(_) => None,
        }
    }
}

/// The judge's final ruling (Entity, immutable once built)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub rationale: String,
    /// Set when `rationale` was derived from the structured synthesis
    #[serde(default)]
    pub rationale_synthesized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<DebaterRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<Irac>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesis_text: Option<String>,
    #[serde(default)]
    pub key_factors: Vec<String>,
    #[serde(default)]
    pub key_citations: Vec<String>,
}

impl Decision {
    /// Build a decision from a payload that passed validation for `kind`.
    ///
    /// The decision letter is parsed strictly. A missing rationale is the
    /// only gap that is filled: when an IRAC synthesis exists the rationale
    /// is derived from its rule and application.
    pub fn from_payload(kind: PayloadKind, payload: &Value) -> Result<Decision, DomainError> {
        let verdict = match kind {
            PayloadKind::DecisionMcq | PayloadKind::DecisionIrac | PayloadKind::DecisionHybrid => {
                let letter = payload
                    .get("decision")
                    .and_then(Value::as_str)
                    .ok_or_else(|| DomainError::illegal_state("payload field 'decision' was not validated"))?;
                Verdict::Choice(Choice::parse(letter)?)
            }
            PayloadKind::DecisionSynthesis => {
                let answer = optional_text(payload, "final_answer").ok_or_else(|| {
                    DomainError::illegal_state("payload field 'final_answer' was not validated")
                })?;
                Verdict::FinalAnswer(answer)
            }
            other => {
                return Err(DomainError::illegal_state(format!(
                    "{} is not a decision payload",
                    other
                )));
            }
        };

        let (synthesis, synthesis_text) = match kind {
            PayloadKind::DecisionIrac => {
                let irac = payload.get("synthesis").and_then(Irac::from_value).ok_or_else(|| {
                    DomainError::illegal_state("payload field 'synthesis' was not validated")
                })?;
                (Some(irac), None)
            }
            PayloadKind::DecisionHybrid => (None, optional_text(payload, "synthesis")),
            _ => (None, None),
        };

        let winner = payload
            .get("winner")
            .and_then(Value::as_str)
            .and_then(DebaterRole::from_winner);

        let key_citations = text_list(payload, "key_citations");
        let decision = Decision {
            verdict,
            rationale: optional_text(payload, "rationale").unwrap_or_default(),
            rationale_synthesized: false,
            winner,
            synthesis,
            synthesis_text,
            key_factors: text_list(payload, "key_factors"),
            key_citations,
        };
        Ok(decision.with_derived_rationale())
    }

    /// Letter decided, in multiple-choice modes
    pub fn choice(&self) -> Option<Choice> {
        self.verdict.as_choice()
    }

    fn with_derived_rationale(mut self) -> Self {
        if !self.rationale.is_empty() {
            return self;
        }
        if let (Some(irac), Some(choice)) = (&self.synthesis, self.verdict.as_choice()) {
            self.rationale = format!(
                "Decision {} is correct because {} supports this conclusion. {}",
                choice,
                irac.rule,
                prefix_chars(&irac.application, RATIONALE_APPLICATION_LEN)
            );
            self.rationale_synthesized = true;
        }
        self
    }
}
