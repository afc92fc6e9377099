//! Arguments produced by debaters

use super::role::DebaterRole;
use crate::core::choice::Choice;
use crate::core::error::DomainError;
use crate::core::string::truncate;
use crate::schema::payload::PayloadKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Length of derived summaries and free-form positions
const SUMMARY_LEN: usize = 300;
const FREE_FORM_POSITION_LEN: usize = 200;

/// Issue-Rule-Application-Conclusion analysis (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Irac {
    pub issue: String,
    pub rule: String,
    pub application: String,
    pub conclusion: String,
}

impl Irac {
    /// Read an IRAC object from an already validated payload field.
    pub fn from_value(value: &Value) -> Option<Irac> {
        Some(Irac {
            issue: value.get("issue")?.as_str()?.trim().to_string(),
            rule: value.get("rule")?.as_str()?.trim().to_string(),
            application: value.get("application")?.as_str()?.trim().to_string(),
            conclusion: value.get("conclusion")?.as_str()?.trim().to_string(),
        })
    }
}

/// Position a debater defends
///
/// A letter in multiple-choice modes, a short statement of the thesis in
/// open-ended modes. Serialized tagged (`{"choice": "B"}`) so a thesis that
/// happens to read "B" stays free-form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Choice(Choice),
    FreeForm(String),
}

impl Position {
    pub fn as_choice(&self) -> Option<Choice> {
        match self {
            Position::Choice(choice) => Some(*choice),
            Position::FreeForm(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Position::Choice(choice) => choice.as_str(),
            Position::FreeForm(text) => text,
        }
    }
}

impl From<Choice> for Position {
    fn from(choice: Choice) -> Self {
        Position::Choice(choice)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Debate round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    Opening,
    Rebuttal,
}

impl Round {
    pub fn as_str(&self) -> &'static str {
        match self {
            Round::Opening => "opening",
            Round::Rebuttal => "rebuttal",
        }
    }
}

/// Reasoning carried by an argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentBody {
    Irac(Irac),
    Prose(String),
}

impl ArgumentBody {
    pub fn irac(&self) -> Option<&Irac> {
        match self {
            ArgumentBody::Irac(irac) => Some(irac),
            ArgumentBody::Prose(_) => None,
        }
    }

    /// Flat text of the body, for prompts and reports
    pub fn text(&self) -> String {
        match self {
            ArgumentBody::Irac(irac) => format!(
                "Issue: {}\nRule: {}\nApplication: {}\nConclusion: {}",
                irac.issue, irac.rule, irac.application, irac.conclusion
            ),
            ArgumentBody::Prose(text) => text.clone(),
        }
    }
}

/// One debater's contribution to one round (Entity, immutable once built)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub role: DebaterRole,
    pub round: Round,
    pub position: Position,
    pub body: ArgumentBody,
    /// Critique of the opponent (rebuttals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critique: Option<String>,
    /// Complete essay answer (open-ended IRAC openings)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_answer: Option<String>,
    #[serde(default)]
    pub citations: Vec<String>,
    /// Compressed form used in later prompts
    pub summary: String,
}

impl Argument {
    /// Build an opening from a payload that passed validation for `kind`.
    ///
    /// Multiple-choice positions are parsed strictly; a letter outside
    /// `A..=D` is [`DomainError::InvalidChoice`].
    pub fn opening_from_payload(
        role: DebaterRole,
        kind: PayloadKind,
        payload: &Value,
    ) -> Result<Argument, DomainError> {
        let citations = text_list(payload, "key_citations");

        let (position, body, full_answer, summary) = match kind {
            PayloadKind::OpeningIrac => {
                let position = Position::Choice(Choice::parse(required_text(payload, "position")?)?);
                let irac = required_irac(payload, "irac")?;
                let summary = optional_text(payload, "argument_summary")
                    .unwrap_or_else(|| truncate(&irac.conclusion, SUMMARY_LEN));
                (position, ArgumentBody::Irac(irac), None, summary)
            }
            PayloadKind::OpeningVanilla => {
                let position = Position::Choice(Choice::parse(required_text(payload, "position")?)?);
                let argument = required_text(payload, "argument")?.trim().to_string();
                let summary = optional_text(payload, "argument_summary")
                    .unwrap_or_else(|| truncate(&argument, SUMMARY_LEN));
                (position, ArgumentBody::Prose(argument), None, summary)
            }
            PayloadKind::OpeningOpenEndedIrac => {
                let irac = required_irac(payload, "irac")?;
                let full_answer = required_text(payload, "full_answer")?.trim().to_string();
                let position =
                    Position::FreeForm(truncate(&irac.conclusion, FREE_FORM_POSITION_LEN));
                let summary = truncate(&full_answer, SUMMARY_LEN);
                (position, ArgumentBody::Irac(irac), Some(full_answer), summary)
            }
            PayloadKind::OpeningOpenEndedVanilla => {
                let answer = required_text(payload, "answer")?.trim().to_string();
                let position = Position::FreeForm(truncate(&answer, FREE_FORM_POSITION_LEN));
                let summary = truncate(&answer, SUMMARY_LEN);
                (position, ArgumentBody::Prose(answer), None, summary)
            }
            other => {
                return Err(DomainError::illegal_state(format!(
                    "{} is not an opening payload",
                    other
                )));
            }
        };

        Ok(Argument {
            role,
            round: Round::Opening,
            position,
            body,
            critique: None,
            full_answer,
            citations,
            summary,
        })
    }

    /// Build a rebuttal from a validated payload. The rebuttal keeps the
    /// position frozen by the debater's opening.
    pub fn rebuttal_from_payload(
        role: DebaterRole,
        kind: PayloadKind,
        payload: &Value,
        position: Position,
    ) -> Result<Argument, DomainError> {
        let citations = text_list(payload, "key_citations");

        let (body, critique, summary) = match kind {
            PayloadKind::RebuttalIrac => {
                let irac = required_irac(payload, "rebuttal_irac")?;
                let counter = required_text(payload, "counter_argument")?.trim().to_string();
                let summary = optional_text(payload, "rebuttal_summary")
                    .unwrap_or_else(|| truncate(&counter, SUMMARY_LEN));
                (ArgumentBody::Irac(irac), Some(counter), summary)
            }
            PayloadKind::RebuttalVanilla => {
                let rebuttal = required_text(payload, "rebuttal")?.trim().to_string();
                let summary = optional_text(payload, "rebuttal_summary")
                    .unwrap_or_else(|| truncate(&rebuttal, SUMMARY_LEN));
                (ArgumentBody::Prose(rebuttal), None, summary)
            }
            PayloadKind::RebuttalOpenEnded => {
                let refined = required_text(payload, "refined_answer")?.trim().to_string();
                let summary = truncate(&refined, SUMMARY_LEN);
                (
                    ArgumentBody::Prose(refined),
                    optional_text(payload, "critique"),
                    summary,
                )
            }
            other => {
                return Err(DomainError::illegal_state(format!(
                    "{} is not a rebuttal payload",
                    other
                )));
            }
        };

        Ok(Argument {
            role,
            round: Round::Rebuttal,
            position,
            body,
            critique,
            full_answer: None,
            citations,
            summary,
        })
    }

    pub fn irac(&self) -> Option<&Irac> {
        self.body.irac()
    }

    /// Best available essay text: the full answer, else the body
    pub fn answer_text(&self) -> String {
        match &self.full_answer {
            Some(answer) => answer.clone(),
            None => self.body.text(),
        }
    }
}

// Field readers for validated payloads. A missing field here means the
// payload kind and the validated value disagree, which is a caller bug.

fn required_text<'a>(payload: &'a Value, key: &str) -> Result<&'a str, DomainError> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::illegal_state(format!("payload field '{}' was not validated", key)))
}

fn required_irac(payload: &Value, key: &str) -> Result<Irac, DomainError> {
    payload
        .get(key)
        .and_then(Irac::from_value)
        .ok_or_else(|| DomainError::illegal_state(format!("payload field '{}' was not validated", key)))
}

pub(crate) fn optional_text(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn text_list(payload: &Value, key: &str) -> Vec<String> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn irac_json() -> Value {
        json!({
            "issue": "Is the clause abusive?",
            "rule": "Art. 51 CDC voids abusive clauses",
            "application": "The clause waives consumer rights",
            "conclusion": "The clause is void"
        })
    }

    #[test]
    fn test_irac_opening() {
        let payload = json!({
            "position": "C",
            "irac": irac_json(),
            "key_citations": ["Art. 51 CDC", "  "],
            "argument_summary": "Clause void under CDC"
        });
        let arg = Argument::opening_from_payload(DebaterRole::X, PayloadKind::OpeningIrac, &payload)
            .unwrap();
        assert_eq!(arg.position, Position::Choice(Choice::C));
        assert_eq!(arg.round, Round::Opening);
        assert_eq!(arg.citations, vec!["Art. 51 CDC"]);
        assert_eq!(arg.summary, "Clause void under CDC");
        assert_eq!(arg.irac().unwrap().rule, "Art. 51 CDC voids abusive clauses");
    }

    #[test]
    fn test_opening_rejects_letter_outside_set() {
        let payload = json!({"position": "E", "irac": irac_json()});
        let err = Argument::opening_from_payload(DebaterRole::X, PayloadKind::OpeningIrac, &payload)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidChoice { .. }));
    }

    #[test]
    fn test_summary_falls_back_to_conclusion() {
        let payload = json!({"position": "A", "irac": irac_json()});
        let arg = Argument::opening_from_payload(DebaterRole::Y, PayloadKind::OpeningIrac, &payload)
            .unwrap();
        assert_eq!(arg.summary, "The clause is void");
    }

    #[test]
    fn test_open_ended_opening_position_is_free_form() {
        let payload = json!({"irac": irac_json(), "full_answer": "Long essay"});
        let arg = Argument::opening_from_payload(
            DebaterRole::X,
            PayloadKind::OpeningOpenEndedIrac,
            &payload,
        )
        .unwrap();
        assert_eq!(arg.position, Position::FreeForm("The clause is void".into()));
        assert_eq!(arg.answer_text(), "Long essay");
    }

    #[test]
    fn test_rebuttal_keeps_frozen_position() {
        let payload = json!({"rebuttal": "Opponent ignores Art. 51", "rebuttal_summary": "Art. 51"});
        let arg = Argument::rebuttal_from_payload(
            DebaterRole::Y,
            PayloadKind::RebuttalVanilla,
            &payload,
            Position::Choice(Choice::A),
        )
        .unwrap();
        assert_eq!(arg.round, Round::Rebuttal);
        assert_eq!(arg.position, Position::Choice(Choice::A));
        assert_eq!(arg.summary, "Art. 51");
    }

    #[test]
    fn test_wrong_payload_kind_is_illegal_state() {
        let payload = json!({"decision": "A"});
        let err = Argument::opening_from_payload(DebaterRole::X, PayloadKind::DecisionMcq, &payload)
            .unwrap_err();
        assert!(matches!(err, DomainError::IllegalState(_)));
    }

    #[test]
    fn test_position_serde_is_tagged() {
        assert_eq!(
            serde_json::to_string(&Position::Choice(Choice::B)).unwrap(),
            r#"{"choice":"B"}"#
        );
        let free: Position = serde_json::from_str(r#"{"free_form": "Liability is strict"}"#).unwrap();
        assert_eq!(free, Position::FreeForm("Liability is strict".into()));

        let letter_thesis = Position::FreeForm("B".into());
        let text = serde_json::to_string(&letter_thesis).unwrap();
        assert_eq!(serde_json::from_str::<Position>(&text).unwrap(), letter_thesis);
    }
}
