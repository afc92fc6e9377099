//! Batch and baseline parameters.

use mad_domain::BaselineMethod;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Batch driver limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchParams {
    /// Questions debated at the same time
    pub max_in_flight: usize,
    /// Tries per question before its failure record is kept
    pub question_attempts: u32,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            max_in_flight: 4,
            question_attempts: 1,
        }
    }
}

impl BatchParams {
    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max;
        self
    }

    pub fn with_question_attempts(mut self, attempts: u32) -> Self {
        self.question_attempts = attempts;
        self
    }
}

/// Self-consistency baseline parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfConsistencyParams {
    pub num_samples: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Token budget for one essay sample
    pub essay_max_tokens: u32,
    /// Budget for one sample; on expiry the sample falls back to a random letter
    pub sample_timeout: Duration,
    /// Pause between failed tries of one sample
    pub retry_pause: Duration,
    pub seed: Option<u64>,
}

impl Default for SelfConsistencyParams {
    fn default() -> Self {
        Self {
            num_samples: 10,
            temperature: 0.7,
            max_tokens: 400,
            essay_max_tokens: 2000,
            sample_timeout: Duration::from_secs(20),
            retry_pause: Duration::from_secs(1),
            seed: None,
        }
    }
}

impl SelfConsistencyParams {
    pub fn with_num_samples(mut self, samples: usize) -> Self {
        self.num_samples = samples;
        self
    }

    pub fn with_sample_timeout(mut self, timeout: Duration) -> Self {
        self.sample_timeout = timeout;
        self
    }

    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Single-agent baseline parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineParams {
    pub method: BaselineMethod,
    /// Temperature for the one-shot methods
    pub temperature: f32,
    /// Token budget for a multiple-choice answer
    pub choice_tokens: u32,
    /// Token budget for a zero-shot essay
    pub essay_tokens: u32,
    /// Token budget for a step-by-step essay
    pub reasoned_essay_tokens: u32,
}

impl Default for BaselineParams {
    fn default() -> Self {
        Self {
            method: BaselineMethod::default(),
            temperature: 0.0,
            choice_tokens: 500,
            essay_tokens: 1500,
            reasoned_essay_tokens: 2000,
        }
    }
}

impl BaselineParams {
    pub fn with_method(mut self, method: BaselineMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}
