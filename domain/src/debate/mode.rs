//! Debate mode and position-assignment policy
//!
//! A single debater/judge implementation is parameterized by [`DebateMode`]
//! instead of one type per experiment variant.

use crate::schema::payload::PayloadKind;
use serde::{Deserialize, Serialize};

/// How agents structure their output
///
/// | Mode | Opening | Rebuttal | Judge |
/// |------|---------|----------|-------|
/// | `Vanilla` | free argument | free rebuttal | decision |
/// | `Irac` | IRAC | IRAC | decision + IRAC synthesis |
/// | `IracHybrid` | IRAC | free rebuttal | decision + winner |
/// | `OpenEnded` | IRAC + essay | refined essay | synthesized answer |
/// | `OpenEndedVanilla` | essay | refined essay | synthesized answer |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DebateMode {
    Vanilla,
    Irac,
    #[default]
    IracHybrid,
    OpenEnded,
    OpenEndedVanilla,
}

impl DebateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateMode::Vanilla => "vanilla",
            DebateMode::Irac => "irac",
            DebateMode::IracHybrid => "irac-hybrid",
            DebateMode::OpenEnded => "open-ended",
            DebateMode::OpenEndedVanilla => "open-ended-vanilla",
        }
    }

    /// Whether positions and decisions come from the `A..=D` set
    pub fn is_multiple_choice(&self) -> bool {
        matches!(
            self,
            DebateMode::Vanilla | DebateMode::Irac | DebateMode::IracHybrid
        )
    }

    /// Payload shape expected from an opening argument
    pub fn opening_kind(&self) -> PayloadKind {
        match self {
            DebateMode::Vanilla => PayloadKind::OpeningVanilla,
            DebateMode::Irac | DebateMode::IracHybrid => PayloadKind::OpeningIrac,
            DebateMode::OpenEnded => PayloadKind::OpeningOpenEndedIrac,
            DebateMode::OpenEndedVanilla => PayloadKind::OpeningOpenEndedVanilla,
        }
    }

    /// Payload shape expected from a rebuttal
    pub fn rebuttal_kind(&self) -> PayloadKind {
        match self {
            DebateMode::Irac => PayloadKind::RebuttalIrac,
            DebateMode::Vanilla | DebateMode::IracHybrid => PayloadKind::RebuttalVanilla,
            DebateMode::OpenEnded | DebateMode::OpenEndedVanilla => PayloadKind::RebuttalOpenEnded,
        }
    }

    /// Payload shape expected from the judge
    pub fn decision_kind(&self) -> PayloadKind {
        match self {
            DebateMode::Vanilla => PayloadKind::DecisionMcq,
            DebateMode::Irac => PayloadKind::DecisionIrac,
            DebateMode::IracHybrid => PayloadKind::DecisionHybrid,
            DebateMode::OpenEnded | DebateMode::OpenEndedVanilla => PayloadKind::DecisionSynthesis,
        }
    }
}

impl std::fmt::Display for DebateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DebateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "vanilla" => Ok(DebateMode::Vanilla),
            "irac" => Ok(DebateMode::Irac),
            "irac-hybrid" | "hybrid" => Ok(DebateMode::IracHybrid),
            "open-ended" | "oab" => Ok(DebateMode::OpenEnded),
            "open-ended-vanilla" | "oab-vanilla" => Ok(DebateMode::OpenEndedVanilla),
            other => Err(format!("unknown debate mode: {}", other)),
        }
    }
}

/// How opening positions are handed out in multiple-choice modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentPolicy {
    /// Two distinct positions are drawn before either debater runs;
    /// openings are independent and run concurrently.
    IndependentDistinct,
    /// Debater X picks freely; Debater Y is assigned one of the remaining
    /// three at random once X has answered.
    #[default]
    FreeThenConstrained,
}

impl AssignmentPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentPolicy::IndependentDistinct => "independent-distinct",
            AssignmentPolicy::FreeThenConstrained => "free-then-constrained",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AssignmentPolicy::IndependentDistinct => {
                "X and Y assigned distinct random positions before opening"
            }
            AssignmentPolicy::FreeThenConstrained => {
                "X chooses freely, Y assigned different position"
            }
        }
    }
}

impl std::fmt::Display for AssignmentPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssignmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "independent-distinct" | "independent" => Ok(AssignmentPolicy::IndependentDistinct),
            "free-then-constrained" | "free" => Ok(AssignmentPolicy::FreeThenConstrained),
            other => Err(format!("unknown assignment policy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_roundtrip() {
        for mode in [
            DebateMode::Vanilla,
            DebateMode::Irac,
            DebateMode::IracHybrid,
            DebateMode::OpenEnded,
            DebateMode::OpenEndedVanilla,
        ] {
            assert_eq!(mode.as_str().parse::<DebateMode>().unwrap(), mode);
        }
        assert_eq!("irac_hybrid".parse::<DebateMode>().unwrap(), DebateMode::IracHybrid);
        assert!("socratic".parse::<DebateMode>().is_err());
    }

    #[test]
    fn test_hybrid_mixes_irac_opening_with_free_rebuttal() {
        let mode = DebateMode::IracHybrid;
        assert_eq!(mode.opening_kind(), PayloadKind::OpeningIrac);
        assert_eq!(mode.rebuttal_kind(), PayloadKind::RebuttalVanilla);
        assert_eq!(mode.decision_kind(), PayloadKind::DecisionHybrid);
    }

    #[test]
    fn test_multiple_choice_flag() {
        assert!(DebateMode::Irac.is_multiple_choice());
        assert!(!DebateMode::OpenEnded.is_multiple_choice());
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&AssignmentPolicy::IndependentDistinct).unwrap();
        assert_eq!(json, "\"independent-distinct\"");
        assert_eq!(AssignmentPolicy::default(), AssignmentPolicy::FreeThenConstrained);
    }
}
