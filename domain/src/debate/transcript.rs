//! Debate transcript and position-assignment metadata

use super::argument::{Argument, Position};
use super::decision::Decision;
use super::mode::{AssignmentPolicy, DebateMode};
use super::role::DebaterRole;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How a debater came to hold its opening position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    /// Chose its position itself
    Free,
    /// Was told which position to defend
    Assigned,
    /// Opened against the opponent's answer (open-ended modes)
    Adversarial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub source: AssignmentSource,
    pub position: Position,
}

/// Who chose freely, who was assigned, and under which rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAssignment {
    /// `None` in open-ended modes, where there is no letter to assign
    pub policy: Option<AssignmentPolicy>,
    pub strategy: String,
    pub debater_x: RoleAssignment,
    pub debater_y: RoleAssignment,
}

impl PositionAssignment {
    pub fn new(
        policy: AssignmentPolicy,
        debater_x: RoleAssignment,
        debater_y: RoleAssignment,
    ) -> Self {
        Self {
            policy: Some(policy),
            strategy: policy.description().to_string(),
            debater_x,
            debater_y,
        }
    }

    /// X opens neutrally, Y opens against X
    pub fn adversarial(x_position: Position, y_position: Position) -> Self {
        Self {
            policy: None,
            strategy: "X answers freely, Y presents an alternative view".to_string(),
            debater_x: RoleAssignment {
                source: AssignmentSource::Free,
                position: x_position,
            },
            debater_y: RoleAssignment {
                source: AssignmentSource::Adversarial,
                position: y_position,
            },
        }
    }
}

/// The two arguments of one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPair {
    pub debater_x: Argument,
    pub debater_y: Argument,
}

impl RoundPair {
    pub fn new(debater_x: Argument, debater_y: Argument) -> Self {
        Self {
            debater_x,
            debater_y,
        }
    }

    pub fn get(&self, role: DebaterRole) -> &Argument {
        match role {
            DebaterRole::X => &self.debater_x,
            DebaterRole::Y => &self.debater_y,
        }
    }
}

/// One debater's opening and rebuttal
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub opening: &'a Argument,
    pub rebuttal: &'a Argument,
}

/// Everything the judge reads: both openings and both rebuttals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateHistory {
    pub openings: RoundPair,
    pub rebuttals: RoundPair,
}

impl DebateHistory {
    pub fn exchange(&self, role: DebaterRole) -> Exchange<'_> {
        Exchange {
            opening: self.openings.get(role),
            rebuttal: self.rebuttals.get(role),
        }
    }

    /// Frozen opening position of `role`
    pub fn position_of(&self, role: DebaterRole) -> &Position {
        &self.openings.get(role).position
    }

    /// A declared winner must have argued for the decided letter.
    pub fn check_winner(&self, decision: &Decision) -> Result<(), DomainError> {
        let (Some(winner), Some(choice)) = (decision.winner, decision.choice()) else {
            return Ok(());
        };
        let position = self.position_of(winner);
        if position.as_choice() == Some(choice) {
            Ok(())
        } else {
            Err(DomainError::InconsistentRuling {
                decision: choice.to_string(),
                winner: winner.to_string(),
                position: position.to_string(),
            })
        }
    }
}

/// Complete record of one debate (never mutated after the decision)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateTranscript {
    pub question_id: String,
    pub mode: DebateMode,
    pub assignment: PositionAssignment,
    #[serde(flatten)]
    pub history: DebateHistory,
    pub decision: Decision,
}

impl DebateTranscript {
    pub fn openings(&self) -> &RoundPair {
        &self.history.openings
    }

    pub fn rebuttals(&self) -> &RoundPair {
        &self.history.rebuttals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::choice::Choice;
    use crate::debate::argument::{ArgumentBody, Round};
    use crate::debate::decision::Verdict;

    fn argument(role: DebaterRole, round: Round, choice: Choice) -> Argument {
        Argument {
            role,
            round,
            position: Position::Choice(choice),
            body: ArgumentBody::Prose("text".into()),
            critique: None,
            full_answer: None,
            citations: vec![],
            summary: "summary".into(),
        }
    }

    fn history() -> DebateHistory {
        DebateHistory {
            openings: RoundPair::new(
                argument(DebaterRole::X, Round::Opening, Choice::A),
                argument(DebaterRole::Y, Round::Opening, Choice::C),
            ),
            rebuttals: RoundPair::new(
                argument(DebaterRole::X, Round::Rebuttal, Choice::A),
                argument(DebaterRole::Y, Round::Rebuttal, Choice::C),
            ),
        }
    }

    fn decision(choice: Choice, winner: Option<DebaterRole>) -> Decision {
        Decision {
            verdict: Verdict::Choice(choice),
            rationale: String::new(),
            rationale_synthesized: false,
            winner,
            synthesis: None,
            synthesis_text: None,
            key_factors: vec![],
            key_citations: vec![],
        }
    }

    #[test]
    fn test_winner_must_match_position() {
        let history = history();
        assert!(history.check_winner(&decision(Choice::A, Some(DebaterRole::X))).is_ok());
        assert!(history.check_winner(&decision(Choice::C, Some(DebaterRole::Y))).is_ok());

        let err = history
            .check_winner(&decision(Choice::B, Some(DebaterRole::X)))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InconsistentRuling {
                decision: "B".into(),
                winner: "debater_x".into(),
                position: "A".into(),
            }
        );
    }

    #[test]
    fn test_no_winner_is_consistent() {
        assert!(history().check_winner(&decision(Choice::D, None)).is_ok());
    }

    #[test]
    fn test_exchange_by_role() {
        let history = history();
        let y = history.exchange(DebaterRole::Y);
        assert_eq!(y.opening.position, Position::Choice(Choice::C));
        assert_eq!(y.rebuttal.round, Round::Rebuttal);
    }
}
