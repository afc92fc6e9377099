//! Debate session state machine
//!
//! A [`DebateSession`] moves strictly forward through
//! `Init -> Opened -> Rebutted -> Decided` and only yields a
//! [`DebateTranscript`] once the decision is attached. Calling a transition
//! out of order is [`DomainError::IllegalState`].

use super::argument::{Argument, Position, Round};
use super::decision::{Decision, Verdict};
use super::mode::DebateMode;
use super::role::DebaterRole;
use super::transcript::{DebateHistory, DebateTranscript, PositionAssignment, RoundPair};
use crate::core::choice::Choice;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Phase of a debate instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebatePhase {
    Init,
    Opened,
    Rebutted,
    Decided,
}

impl DebatePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebatePhase::Init => "init",
            DebatePhase::Opened => "opened",
            DebatePhase::Rebutted => "rebutted",
            DebatePhase::Decided => "decided",
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit of work inside a debate, used to report where a debate failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateStep {
    Validate,
    OpeningX,
    OpeningY,
    RebuttalX,
    RebuttalY,
    Judgement,
}

impl DebateStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateStep::Validate => "validate",
            DebateStep::OpeningX => "opening_x",
            DebateStep::OpeningY => "opening_y",
            DebateStep::RebuttalX => "rebuttal_x",
            DebateStep::RebuttalY => "rebuttal_y",
            DebateStep::Judgement => "judgement",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DebateStep::Validate => "Validation",
            DebateStep::OpeningX => "Opening (X)",
            DebateStep::OpeningY => "Opening (Y)",
            DebateStep::RebuttalX => "Rebuttal (X)",
            DebateStep::RebuttalY => "Rebuttal (Y)",
            DebateStep::Judgement => "Judgement",
        }
    }

    pub fn opening(role: DebaterRole) -> Self {
        match role {
            DebaterRole::X => DebateStep::OpeningX,
            DebaterRole::Y => DebateStep::OpeningY,
        }
    }

    pub fn rebuttal(role: DebaterRole) -> Self {
        match role {
            DebaterRole::X => DebateStep::RebuttalX,
            DebaterRole::Y => DebateStep::RebuttalY,
        }
    }
}

impl std::fmt::Display for DebateStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One debate instance in progress (Entity)
#[derive(Debug, Clone)]
pub struct DebateSession {
    question_id: String,
    mode: DebateMode,
    phase: DebatePhase,
    assignment: Option<PositionAssignment>,
    openings: Option<RoundPair>,
    rebuttals: Option<RoundPair>,
    decision: Option<Decision>,
}

impl DebateSession {
    pub fn new(question_id: impl Into<String>, mode: DebateMode) -> Self {
        Self {
            question_id: question_id.into(),
            mode,
            phase: DebatePhase::Init,
            assignment: None,
            openings: None,
            rebuttals: None,
            decision: None,
        }
    }

    pub fn question_id(&self) -> &str {
        &self.question_id
    }

    pub fn mode(&self) -> DebateMode {
        self.mode
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    pub fn openings(&self) -> Option<&RoundPair> {
        self.openings.as_ref()
    }

    /// Record both openings: `Init -> Opened`.
    ///
    /// In multiple-choice modes both positions must be letters and the two
    /// debaters must hold different ones.
    pub fn record_openings(
        &mut self,
        assignment: PositionAssignment,
        openings: RoundPair,
    ) -> Result<(), DomainError> {
        self.expect_phase(DebatePhase::Init, "record openings")?;
        check_pair(&openings, Round::Opening)?;

        if self.mode.is_multiple_choice() {
            let x = letter_of(&openings.debater_x.position)?;
            let y = letter_of(&openings.debater_y.position)?;
            if x == y {
                return Err(DomainError::invalid_choice(y.as_str(), &Choice::others(x)));
            }
        }

        self.assignment = Some(assignment);
        self.openings = Some(openings);
        self.phase = DebatePhase::Opened;
        Ok(())
    }

    /// Record both rebuttals: `Opened -> Rebutted`.
    pub fn record_rebuttals(&mut self, rebuttals: RoundPair) -> Result<(), DomainError> {
        self.expect_phase(DebatePhase::Opened, "record rebuttals")?;
        check_pair(&rebuttals, Round::Rebuttal)?;
        self.rebuttals = Some(rebuttals);
        self.phase = DebatePhase::Rebutted;
        Ok(())
    }

    /// The assembled history the judge rules on
    pub fn history(&self) -> Result<DebateHistory, DomainError> {
        self.expect_phase(DebatePhase::Rebutted, "read the debate history")?;
        match (&self.openings, &self.rebuttals) {
            (Some(openings), Some(rebuttals)) => Ok(DebateHistory {
                openings: openings.clone(),
                rebuttals: rebuttals.clone(),
            }),
            _ => Err(DomainError::illegal_state("rebutted session without arguments")),
        }
    }

    /// Attach the judge's decision: `Rebutted -> Decided`.
    pub fn record_decision(&mut self, decision: Decision) -> Result<(), DomainError> {
        self.expect_phase(DebatePhase::Rebutted, "record the decision")?;
        match (&decision.verdict, self.mode.is_multiple_choice()) {
            (Verdict::Choice(_), true) | (Verdict::FinalAnswer(_), false) => {}
            _ => {
                return Err(DomainError::illegal_state(format!(
                    "decision kind does not match {} mode",
                    self.mode
                )));
            }
        }
        self.decision = Some(decision);
        self.phase = DebatePhase::Decided;
        Ok(())
    }

    /// Consume a decided session into its immutable transcript.
    pub fn into_transcript(self) -> Result<DebateTranscript, DomainError> {
        self.expect_phase(DebatePhase::Decided, "build the transcript")?;
        match (self.assignment, self.openings, self.rebuttals, self.decision) {
            (Some(assignment), Some(openings), Some(rebuttals), Some(decision)) => {
                Ok(DebateTranscript {
                    question_id: self.question_id,
                    mode: self.mode,
                    assignment,
                    history: DebateHistory {
                        openings,
                        rebuttals,
                    },
                    decision,
                })
            }
            _ => Err(DomainError::illegal_state("decided session is incomplete")),
        }
    }

    fn expect_phase(&self, expected: DebatePhase, action: &str) -> Result<(), DomainError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DomainError::illegal_state(format!(
                "cannot {} in phase {} (expected {})",
                action, self.phase, expected
            )))
        }
    }
}

fn check_pair(pair: &RoundPair, round: Round) -> Result<(), DomainError> {
    let ok = pair.debater_x.role == DebaterRole::X
        && pair.debater_y.role == DebaterRole::Y
        && pair.debater_x.round == round
        && pair.debater_y.round == round;
    if ok {
        Ok(())
    } else {
        Err(DomainError::illegal_state(format!(
            "arguments are not the X/Y {} pair",
            round.as_str()
        )))
    }
}

fn letter_of(position: &Position) -> Result<Choice, DomainError> {
    position
        .as_choice()
        .ok_or_else(|| DomainError::invalid_choice(position.as_str(), &Choice::ALL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::argument::ArgumentBody;
    use crate::debate::mode::AssignmentPolicy;
    use crate::debate::transcript::{AssignmentSource, RoleAssignment};

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

    fn assignment(x: Choice, y: Choice) -> PositionAssignment {
        PositionAssignment::new(
            AssignmentPolicy::FreeThenConstrained,
            RoleAssignment {
                source: AssignmentSource::Free,
                position: x.into(),
            },
            RoleAssignment {
                source: AssignmentSource::Assigned,
                position: y.into(),
            },
        )
    }

    fn openings(x: Choice, y: Choice) -> RoundPair {
        RoundPair::new(
            argument(DebaterRole::X, Round::Opening, x),
            argument(DebaterRole::Y, Round::Opening, y),
        )
    }

    fn rebuttals(x: Choice, y: Choice) -> RoundPair {
        RoundPair::new(
            argument(DebaterRole::X, Round::Rebuttal, x),
            argument(DebaterRole::Y, Round::Rebuttal, y),
        )
    }

    fn decision(choice: Choice) -> Decision {
        Decision {
            verdict: Verdict::Choice(choice),
            rationale: "r".into(),
            rationale_synthesized: false,
            winner: None,
            synthesis: None,
            synthesis_text: None,
            key_factors: vec![],
            key_citations: vec![],
        }
    }

    #[test]
    fn test_full_lifecycle() {
        let mut session = DebateSession::new("q1", DebateMode::IracHybrid);
        assert_eq!(session.phase(), DebatePhase::Init);

        session
            .record_openings(assignment(Choice::C, Choice::A), openings(Choice::C, Choice::A))
            .unwrap();
        assert_eq!(session.phase(), DebatePhase::Opened);

        session.record_rebuttals(rebuttals(Choice::C, Choice::A)).unwrap();
        assert_eq!(session.phase(), DebatePhase::Rebutted);
        assert_eq!(
            session.history().unwrap().position_of(DebaterRole::Y),
            &Position::Choice(Choice::A)
        );

        session.record_decision(decision(Choice::C)).unwrap();
        let transcript = session.into_transcript().unwrap();
        assert_eq!(transcript.question_id, "q1");
        assert_eq!(transcript.decision.choice(), Some(Choice::C));
        assert_ne!(
            transcript.openings().debater_x.position,
            transcript.openings().debater_y.position
        );
    }

    #[test]
    fn test_same_positions_rejected() {
        let mut session = DebateSession::new("q1", DebateMode::Irac);
        let err = session
            .record_openings(assignment(Choice::B, Choice::B), openings(Choice::B, Choice::B))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidChoice { .. }));
        assert_eq!(session.phase(), DebatePhase::Init);
    }

    #[test]
    fn test_rebuttal_before_opening_is_illegal() {
        let mut session = DebateSession::new("q1", DebateMode::Vanilla);
        let err = session
            .record_rebuttals(rebuttals(Choice::A, Choice::B))
            .unwrap_err();
        assert!(matches!(err, DomainError::IllegalState(_)));
    }

    #[test]
    fn test_transcript_before_decision_is_illegal() {
        let mut session = DebateSession::new("q1", DebateMode::Vanilla);
        session
            .record_openings(assignment(Choice::A, Choice::B), openings(Choice::A, Choice::B))
            .unwrap();
        assert!(session.history().is_err());
        assert!(session.into_transcript().is_err());
    }

    #[test]
    fn test_swapped_roles_rejected() {
        let mut session = DebateSession::new("q1", DebateMode::Vanilla);
        let swapped = RoundPair::new(
            argument(DebaterRole::Y, Round::Opening, Choice::A),
            argument(DebaterRole::X, Round::Opening, Choice::B),
        );
        assert!(session
            .record_openings(assignment(Choice::A, Choice::B), swapped)
            .is_err());
    }

    #[test]
    fn test_free_text_verdict_rejected_in_mcq_mode() {
        let mut session = DebateSession::new("q1", DebateMode::Vanilla);
        session
            .record_openings(assignment(Choice::A, Choice::B), openings(Choice::A, Choice::B))
            .unwrap();
        session.record_rebuttals(rebuttals(Choice::A, Choice::B)).unwrap();
        let mut essay = decision(Choice::A);
        essay.verdict = Verdict::FinalAnswer("essay".into());
        assert!(session.record_decision(essay).is_err());
    }
}
