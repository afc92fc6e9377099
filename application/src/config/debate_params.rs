//! Debate parameters: mode, assignment policy, sampling and token budgets.

use mad_domain::{AssignmentPolicy, DebateMode};
use serde::{Deserialize, Serialize};

/// Per-call token ceilings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBudgets {
    pub opening: u32,
    pub rebuttal: u32,
    pub judge: u32,
    /// Openings and rebuttals in open-ended modes (full essays)
    pub open_ended: u32,
    /// Judge synthesis in open-ended modes
    pub synthesis: u32,
}

impl Default for TokenBudgets {
    fn default() -> Self {
        Self {
            opening: 1200,
            rebuttal: 1000,
            judge: 1200,
            open_ended: 2000,
            synthesis: 1500,
        }
    }
}

impl TokenBudgets {
    pub fn opening_for(&self, mode: DebateMode) -> u32 {
        if mode.is_multiple_choice() {
            self.opening
        } else {
            self.open_ended
        }
    }

    pub fn rebuttal_for(&self, mode: DebateMode) -> u32 {
        if mode.is_multiple_choice() {
            self.rebuttal
        } else {
            self.open_ended
        }
    }

    pub fn judge_for(&self, mode: DebateMode) -> u32 {
        if mode.is_multiple_choice() {
            self.judge
        } else {
            self.synthesis
        }
    }
}

/// Parameters of a debate run
///
/// Debaters sample with a higher temperature for diverse arguments; the
/// judge defaults to zero so the ruling is reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateParams {
    pub mode: DebateMode,
    pub assignment: AssignmentPolicy,
    pub debater_temperature: f32,
    pub judge_temperature: f32,
    pub budgets: TokenBudgets,
    /// Total tries of the schema-validated generation helper
    pub validation_attempts: u32,
    /// Seed for position sampling; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            mode: DebateMode::default(),
            assignment: AssignmentPolicy::default(),
            debater_temperature: 0.7,
            judge_temperature: 0.0,
            budgets: TokenBudgets::default(),
            validation_attempts: 3,
            seed: None,
        }
    }
}

impl DebateParams {
    pub fn with_mode(mut self, mode: DebateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_assignment(mut self, policy: AssignmentPolicy) -> Self {
        self.assignment = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_validation_attempts(mut self, attempts: u32) -> Self {
        self.validation_attempts = attempts;
        self
    }

    pub fn with_temperatures(mut self, debater: f32, judge: f32) -> Self {
        self.debater_temperature = debater;
        self.judge_temperature = judge;
        self
    }

    pub fn with_budgets(mut self, budgets: TokenBudgets) -> Self {
        self.budgets = budgets;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_selection_by_mode() {
        let budgets = TokenBudgets::default();
        assert_eq!(budgets.opening_for(DebateMode::Irac), 1200);
        assert_eq!(budgets.opening_for(DebateMode::OpenEnded), 2000);
        assert_eq!(budgets.rebuttal_for(DebateMode::Vanilla), 1000);
        assert_eq!(budgets.judge_for(DebateMode::OpenEndedVanilla), 1500);
    }

    #[test]
    fn test_defaults() {
        let params = DebateParams::default();
        assert_eq!(params.mode, DebateMode::IracHybrid);
        assert_eq!(params.assignment, AssignmentPolicy::FreeThenConstrained);
        assert_eq!(params.judge_temperature, 0.0);
        assert_eq!(params.validation_attempts, 3);
    }
}
