//! Gateway parameters: retry policy and request timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry and timeout policy of the [`GenerationGateway`](crate::gateway::GenerationGateway).
///
/// `max_retries` is the total number of attempts for one logical call,
/// not the number of repeats after the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Bound on a single backend call
    pub request_timeout: Duration,
    /// Retry once in plain-text mode when JSON mode fails
    pub json_fallback: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
            request_timeout: Duration::from_secs(120),
            json_fallback: true,
        }
    }
}

impl GatewayConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn without_json_fallback(mut self) -> Self {
        self.json_fallback = false;
        self
    }

    /// Attempts actually made: at least one
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Wait before retry number `retry` (zero-based): `base_delay * 2^retry`,
    /// capped at `max_delay`.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}
