//! Application layer for legal-mad
//!
//! This crate contains the debate agents, use cases, port definitions and
//! application configuration. It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ports;
pub mod use_cases;
pub mod validation;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use agents::{Debater, DebaterState, Judge};
pub use config::{
    BaselineParams, BatchParams, DebateParams, GatewayConfig, SelfConsistencyParams, TokenBudgets,
};
pub use error::DebateError;
pub use gateway::{GatewayError, GenerationError, GenerationGateway, JsonReply};
pub use ports::{
    generation_backend::{
        BackendError, BackendErrorKind, GenerationBackend, GenerationRequest,
    },
    progress::{BatchProgressNotifier, DebateProgressNotifier, NoProgress, QuestionStatus},
    result_sink::{NoResultSink, ResultSink},
};
pub use use_cases::baseline::{
    BaselineError, BaselineRecord, BaselineSample, RunBaselineUseCase, SelfConsistencyUseCase,
    SingleAgentUseCase, essay_vote, majority_vote,
};
pub use use_cases::run_batch::{BatchSummary, RunBatchUseCase};
pub use use_cases::run_debate::{DebateRunError, RunDebateUseCase};
pub use validation::generate_with_validation;
