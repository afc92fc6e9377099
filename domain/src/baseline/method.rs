//! Baseline method selector

use serde::{Deserialize, Serialize};

/// Single-agent method run instead of a debate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaselineMethod {
    /// One zero-shot JSON answer
    Single,
    /// Chain of thought: a bare final answer for multiple choice, step-by-step
    /// reasoning before the essay for open-ended questions
    Cot,
    /// Chain of thought steered by IRAC
    CotIrac,
    /// Majority over several sampled answers
    #[default]
    SelfConsistency,
}

impl BaselineMethod {
    pub const ALL: [BaselineMethod; 4] = [
        BaselineMethod::Single,
        BaselineMethod::Cot,
        BaselineMethod::CotIrac,
        BaselineMethod::SelfConsistency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BaselineMethod::Single => "single",
            BaselineMethod::Cot => "cot",
            BaselineMethod::CotIrac => "cot-irac",
            BaselineMethod::SelfConsistency => "self-consistency",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BaselineMethod::Single => "Single-Agent",
            BaselineMethod::Cot => "Chain-of-Thought",
            BaselineMethod::CotIrac => "IRAC Chain-of-Thought",
            BaselineMethod::SelfConsistency => "Self-Consistency",
        }
    }
}

impl std::fmt::Display for BaselineMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BaselineMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "single" | "single-agent" | "zero-shot" => Ok(BaselineMethod::Single),
            "cot" => Ok(BaselineMethod::Cot),
            "cot-irac" | "irac-cot" => Ok(BaselineMethod::CotIrac),
            "self-consistency" | "sc" => Ok(BaselineMethod::SelfConsistency),
            other => Err(format!("unknown baseline method: {}", other)),
        }
    }
}
