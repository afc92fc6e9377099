//! Application-level configuration.
//!
//! Plain parameter types consumed by the gateway, the agents and the use
//! cases. Loading them from files or the environment is the
//! infrastructure layer's job.
//!
//! - [`GatewayConfig`]: retry count, backoff and request timeout
//! - [`DebateParams`]: mode, assignment policy, temperatures, token budgets
//! - [`BatchParams`]: batch limits
//! - [`BaselineParams`] / [`SelfConsistencyParams`]: single-agent baselines

pub mod batch_params;
pub mod debate_params;
pub mod gateway_config;

pub use batch_params::{BaselineParams, BatchParams, SelfConsistencyParams};
pub use debate_params::{DebateParams, TokenBudgets};
pub use gateway_config::GatewayConfig;
