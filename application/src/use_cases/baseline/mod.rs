//! Single-agent baselines
//!
//! Reference points for debate accuracy. Every method answers alone through
//! the same [`GenerationGateway`] the debaters use:
//!
//! | Method             | Multiple choice              | Essay                        |
//! |--------------------|------------------------------|------------------------------|
//! | `single`           | one JSON letter              | one JSON essay               |
//! | `cot` / `cot-irac` | plain text, `Final Answer: X`| step-by-step JSON essay      |
//! | `self-consistency` | majority over sampled letters| majority over essay prefixes |

mod self_consistency;
mod single_agent;
mod types;

pub use self_consistency::{ESSAY_VOTE_PREFIX, SelfConsistencyUseCase, essay_vote, majority_vote};
pub use single_agent::{SingleAgentUseCase, read_final_answer};
pub use types::{BaselineError, BaselineRecord, BaselineSample};

use crate::config::{BaselineParams, SelfConsistencyParams};
use crate::gateway::GenerationGateway;
use crate::ports::generation_backend::GenerationBackend;
use crate::ports::result_sink::ResultSink;
use mad_domain::{BaselineMethod, Choice, DebateMode, LegalQuestion};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Runs the configured baseline method over questions
pub struct RunBaselineUseCase<B: GenerationBackend + 'static> {
    method: BaselineMethod,
    single: SingleAgentUseCase<B>,
    self_consistency: SelfConsistencyUseCase<B>,
}

impl<B: GenerationBackend + 'static> RunBaselineUseCase<B> {
    pub fn new(
        gateway: Arc<GenerationGateway<B>>,
        params: BaselineParams,
        self_consistency: SelfConsistencyParams,
    ) -> Self {
        Self {
            method: params.method,
            single: SingleAgentUseCase::new(Arc::clone(&gateway), params),
            self_consistency: SelfConsistencyUseCase::new(gateway, self_consistency),
        }
    }

    pub fn method(&self) -> BaselineMethod {
        self.method
    }

    pub async fn execute(&self, question: &LegalQuestion) -> Result<BaselineRecord, BaselineError> {
        match self.method {
            BaselineMethod::Single => self.single.answer(question).await,
            BaselineMethod::Cot => self.single.chain_of_thought(question, false).await,
            BaselineMethod::CotIrac => self.single.chain_of_thought(question, true).await,
            BaselineMethod::SelfConsistency => self.self_consistency.execute(question).await,
        }
    }

    /// Run the method over `questions` one at a time, writing each record.
    ///
    /// A question that fails is logged and skipped.
    pub async fn execute_all(
        &self,
        questions: &[LegalQuestion],
        sink: &dyn ResultSink,
    ) -> Vec<BaselineRecord> {
        let mut records = Vec::with_capacity(questions.len());
        for question in questions {
            match self.execute(question).await {
                Ok(record) => {
                    sink.write_baseline(&record);
                    records.push(record);
                }
                Err(e) => warn!("Skipping {} ({}): {}", question.id, self.method, e),
            }
        }
        records
    }
}

/// Questions with choices need all four; essays only need text.
fn validate(question: &LegalQuestion) -> Result<(), BaselineError> {
    let mode = if question.is_multiple_choice() {
        DebateMode::Vanilla
    } else {
        DebateMode::OpenEnded
    };
    question
        .validate_for(mode)
        .map_err(|e| BaselineError::InvalidQuestion(e.to_string()))
}

fn read_letter(payload: &Value) -> Option<Choice> {
    match payload.get("answer")? {
        Value::String(s) => Choice::extract_from(s),
        other => Choice::extract_from(&other.to_string()),
    }
}

fn read_essay(payload: &Value) -> Option<String> {
    payload
        .get("answer")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn read_text(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// String entries of a JSON list; a bare string counts as one entry.
fn read_text_list(payload: &Value, key: &str) -> Vec<String> {
    match payload.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}
